//! # Names
//!
//! Slugs for catalog filters and base forms of Spanish common names.
//!
//! ## Common Name Base
//! Common names carry qualifiers after the base noun, e.g. "Cutín de Quito" or "Sapito verde". The base is
//! what remains once those are dropped. Rules apply in order and are case-insensitive:
//! 1. "de <body part> <adjective>", optionally followed by "con/sin ...", keeps "de <body part>" and stops.
//! 2. "Rana de cristal/casco/espuma/dedos delgados de ..." keeps the compound.
//! 3. A descriptive noun ("hojarasquero", "arlequín", ...) followed by "de <Place>" or a dangling "de" keeps
//!    the noun.
//! 4. A descriptive or base noun followed by one more word drops that word.
//! 5. "con ..." is removed.
//! 6. "de <Place>" is removed.
//! 7. "del bosque/Norte/Chocó/..." followed by one word keeps the "del" phrase and stops.
//! 8. "del <Place>" is removed unless the place is one of the fixed exceptions.
//! 9. "amante de ..." and "en forma de ..." keep only "amante" / "en forma".
//! 10. Known trailing phrases, then one trailing adjective, then one trailing proper name are removed.
use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

const BODY_PARTS: &str = concat!(
    "bosque|pies|vientre|cabeza|dorso|disco|ojos|muslos|patas|dedos|flancos|ingle|ingles|",
    "líneas|manchas|puntos|rayas|saco|párpado|color|garganta|hocico|rostro|brazo|membrana|",
    "bigote|membranas|cara|gula|trasero|plano|rorso|anteojos|labio|labios",
);
const DESCRIPTORS: &str = concat!(
    "hojarasquero|arlequín|espinosa|torrentícola|venenosa|arbórea|cohete|gladiadora|gomosa|",
    "verde|ágil|nodriza|dedilarga|bullanguero|listada|marsupial|hoja",
);
const BASE_NOUNS: &str = concat!(
    r"hocicuda|de\s+charco|",
    "Ilulo|Sapo|Sapito|Cutín|Cutin|Rana|Ranita|Salamandra|Kayla|Pipa|Smilisca",
);
const DEL_PLACES: &str = r"bosque|Norte|Chocó|Cóndor|Gualaceño|Alto\s+Amazonas";
const TRAILING_PHRASES: &str = concat!(
    r"amazónico\s+variable|cabeza\s+grande|calcar\s+pequeño|diablo\s+andino|gigante\s+andino|",
    r"línea\s+amarilla|más\s+hermoso|muslo\s+negro|negro\s+y\s+gris|no\s+saltarín|",
    r"previo\s+a\s+la\s+muerte|rojo\s+sangre|salpicado\s+pálido|tuberculoso\s+pequeño|",
    r"verde\s+rojizo|gigante\s+moteado|mágica\s+y\s+maravillosa|mapa\s+apendiculado|",
    r"anteojos\s+bifurcado|de\s+la\s+costa|juiciu\s+jambatu|gran\s+hermano|",
    r"de\s+cinco\s+líneas|de\s+ojos\s+rojos|punteada\s+naranja|punteada\s+rosada",
);
const ADJECTIVES: &str = concat!(
    "adornado|afortunado|afro|ágata|amazónico|anaranjado|andino|atenuado|alado|amistoso|",
    "balador|bello|bonito|bromelícola|café|cañari|ceniciento|ceñudo|charlatán|conífero|",
    "coronado|cornudo|desnudo|diferente|diminuto|ecuatoriano|elfo|enano|enguatado|",
    "escondedor|espadachín|espejo|espinoso|exiliado|frío|gigante|glandular|grande|grueso|",
    "gualita|guardián|labioso|llorón|luchador|magnífico|manchado|marino|mezclado|minúsculo|",
    "minuto|modesto|montañero|morlaco|moteado|mutable|narizón|negro|negra|obscuro|ocelado|",
    "ocultador|pequeño|peruano|pinchaque|pseudoacuminado|raro|resplandeciente|rugoso|",
    "sacharuna|saltarín|salpicado|sanguinolento|sencillo|silencioso|solitario|sonrosado|",
    "sordo|sucio|tiktik|tímido|truncado|tubercular|variable|variado|verde|vertebralis|viudo|",
    "marrones|anómala|salpicada|ecuatoriana|minúscula|punteada|naranja|rosada|amarilla|azul|",
    "blanca",
);
const PROPER_NAMES: &str = concat!(
    r"Cuico|Kichwa|Quechua|Waorani|Yumbo|Tesoro|Tsáchila|Siona|Puro\s+Coffee|",
    r"Príncipe\s+Carlos|Jambato|Zápara",
);

fn rule(pattern: String) -> Regex {
    Regex::new(&format!("(?i){pattern}")).unwrap()
}

static BODY_PART_CON_SIN: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"(de\s+(?:{BODY_PARTS}))\s+\w+\s+(?:con|sin)\s+[\w\s]+$")));
static BODY_PART_ADJECTIVE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"(de\s+(?:{BODY_PARTS}))\s+\w+$")));
static RANA_COMPOUND: LazyLock<Regex> = LazyLock::new(|| {
    rule(r"(Rana\s+de\s+(?:cristal|casco|dedos\s+delgados|espuma))\s+de\s+.+$".to_string())
});
static DESCRIPTOR_DE_PLACE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"({DESCRIPTORS}|amazónica)\s+de\s+[A-ZÁÉÍÓÚÑÜ].+$")));
static DESCRIPTOR_DANGLING_DE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"({DESCRIPTORS})\s+de$")));
static NOUN_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    rule(format!(r"^(.*\s+)({DESCRIPTORS}|amazónica|{BASE_NOUNS})\s+\w+$"))
});
static CON_SUFFIX: LazyLock<Regex> = LazyLock::new(|| rule(r"\s+con\s+[\w\s]+$".to_string()));
static DE_PLACE: LazyLock<Regex> =
    LazyLock::new(|| rule(r"\s+de\s+[A-ZÁÉÍÓÚÑÜ].+$".to_string()));
static DEL_PLACE_ADJECTIVE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"(del\s+(?:{DEL_PLACES}))\s+\w+$")));
static DEL_EXCEPTIONS: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"\s+del\s+(?:{DEL_PLACES}|Padre)")));
static DEL_PLACE: LazyLock<Regex> =
    LazyLock::new(|| rule(r"\s+del\s+[A-ZÁÉÍÓÚÑÜ].+$".to_string()));
static AMANTE_DE: LazyLock<Regex> = LazyLock::new(|| rule(r"(\s+amante)\s+de\s+.+$".to_string()));
static EN_FORMA_DE: LazyLock<Regex> =
    LazyLock::new(|| rule(r"(\s+en\s+forma)\s+de\s+.+$".to_string()));
static TRAILING_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"\s+(?:{TRAILING_PHRASES})$")));
static TRAILING_ADJECTIVE: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"\s+(?:{ADJECTIVES})$")));
static TRAILING_PROPER_NAME: LazyLock<Regex> =
    LazyLock::new(|| rule(format!(r"\s+(?:{PROPER_NAMES})$")));

/// Lowercase with diacritics stripped. Used for accent-insensitive comparison.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn slug(text: &str) -> String {
    let kept: String = fold(text)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let dashed = WHITESPACE.replace_all(kept.trim(), "-");
    DASHES.replace_all(&dashed, "-").into_owned()
}

/// Splits a comma separated catalog column into slugs.
pub fn parse_catalog_string(catalog: Option<&str>) -> Vec<String> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };

    catalog
        .split(',')
        .map(|item| slug(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn common_name_base(full_name: &str) -> String {
    let mut name = full_name.trim().to_string();

    for prefix_rule in [&*BODY_PART_CON_SIN, &*BODY_PART_ADJECTIVE] {
        if let Some(base) = keep_through_group(prefix_rule, &name) {
            return base;
        }
    }

    name = RANA_COMPOUND.replace(&name, "$1").into_owned();
    name = DESCRIPTOR_DE_PLACE.replace(&name, "$1").into_owned();
    name = DESCRIPTOR_DANGLING_DE.replace(&name, "$1").into_owned();

    if let Some(captures) = NOUN_SUFFIX.captures(&name) {
        name = format!("{} {}", captures[1].trim(), &captures[2]);
    }

    name = CON_SUFFIX.replace(&name, "").into_owned();
    name = DE_PLACE.replace(&name, "").into_owned();

    if let Some(base) = keep_through_group(&DEL_PLACE_ADJECTIVE, &name) {
        return base;
    }

    if !DEL_EXCEPTIONS.is_match(&name) {
        name = DEL_PLACE.replace(&name, "").into_owned();
    }

    name = AMANTE_DE.replace(&name, "$1").into_owned();
    name = EN_FORMA_DE.replace(&name, "$1").into_owned();
    name = TRAILING_PHRASE.replace(&name, "").into_owned();
    name = TRAILING_ADJECTIVE.replace(&name, "").into_owned();
    name = TRAILING_PROPER_NAME.replace(&name, "").into_owned();

    name.trim().to_string()
}

/// Text before the match followed by the first capture group, or `None` when the rule does not apply.
fn keep_through_group(rule: &Regex, name: &str) -> Option<String> {
    let captures = rule.captures(name)?;
    let start = captures.get(0)?.start();

    Some(format!("{}{}", &name[..start], &captures[1]).trim().to_string())
}

/// Most frequent base name among the given common names, compared without accents or case.
/// Ties go to the shorter form, then to the first seen.
pub fn representative_common_name<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for name in names.into_iter().flatten() {
        if name.trim().is_empty() {
            continue;
        }

        let base = common_name_base(name);
        if base.is_empty() {
            continue;
        }

        match positions.get(&fold(&base)) {
            Some(&index) => counts[index].1 += 1,
            None => {
                positions.insert(fold(&base), counts.len());
                counts.push((base, 1));
            }
        }
    }

    let mut best: Option<&(String, usize)> = None;
    for candidate in &counts {
        best = match best {
            Some(current)
                if candidate.1 < current.1
                    || (candidate.1 == current.1 && candidate.0.len() >= current.0.len()) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        };
    }

    best.map(|(name, _)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold() {
        assert_eq!(fold("Cutín"), "cutin");
        assert_eq!(fold("ÁRBOL"), "arbol");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Bosque Húmedo Tropical"), "bosque-humedo-tropical");
        assert_eq!(slug("  Zamora - Chinchipe "), "zamora-chinchipe");
        assert_eq!(slug("Reserva (Privada)!"), "reserva-privada");
        assert_eq!(slug("!@#"), "");
    }

    #[test]
    fn test_parse_catalog_string() {
        assert_eq!(
            parse_catalog_string(Some("Chocó, Costa,, Amazonía ")),
            vec!["choco", "costa", "amazonia"]
        );
        assert!(parse_catalog_string(None).is_empty());
        assert!(parse_catalog_string(Some("")).is_empty());
    }

    #[test]
    fn test_common_name_base() {
        assert_eq!(common_name_base("Cutín de Quito"), "Cutín");
        assert_eq!(common_name_base("Sapito verde"), "Sapito");
        assert_eq!(common_name_base("Rana arbórea con manchas rojas"), "Rana arbórea");
        assert_eq!(common_name_base("Jambato del Cóndor"), "Jambato del Cóndor");
        assert_eq!(common_name_base("Cecilia del Napo"), "Cecilia");
        assert_eq!(common_name_base("Salamandra amante de musgo"), "Salamandra amante");
        assert_eq!(common_name_base("  Rana de cristal  "), "Rana");
    }

    #[test]
    fn test_common_name_base_descriptors() {
        assert_eq!(common_name_base("Hojarasquero de Pastaza verde"), "Hojarasquero");
        assert_eq!(common_name_base("Rana venenosa de"), "Rana venenosa");
        assert_eq!(common_name_base("Rana cohete rayada"), "Rana cohete");
    }

    #[test]
    fn test_common_name_base_keeps_body_part() {
        assert_eq!(common_name_base("Cutín de dorso liso con manchas"), "Cutín de dorso");
        assert_eq!(common_name_base("Rana de pies blancos"), "Rana de pies");
        assert_eq!(common_name_base("Cutín del bosque nublado"), "Cutín del bosque");
    }

    #[test]
    fn test_common_name_base_trailing_words() {
        assert_eq!(common_name_base("Sapo gigante moteado"), "Sapo");
        assert_eq!(common_name_base("Cutín Kichwa"), "Cutín");
        assert_eq!(common_name_base(""), "");
    }

    #[test]
    fn test_representative_common_name() {
        let names = [
            Some("Cutín de Quito"),
            Some("cutin del Napo"),
            None,
            Some("Rana verde"),
            Some(""),
        ];

        assert_eq!(representative_common_name(names), Some("Cutín".to_string()));
    }

    #[test]
    fn test_representative_tie_prefers_shorter() {
        let names = [Some("Ranita de Pastaza"), Some("Rana verde")];

        assert_eq!(representative_common_name(names), Some("Rana".to_string()));
    }

    #[test]
    fn test_representative_empty() {
        assert_eq!(representative_common_name([None, Some("  ")]), None);
        assert_eq!(representative_common_name(Vec::<Option<&str>>::new()), None);
    }
}
