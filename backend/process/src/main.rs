use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Where to write the taxonomy tree as JSON
    output: PathBuf,

    /// Only export species of this family
    #[arg(long)]
    familia: Option<String>,

    /// Sort orders, families and genera alphabetically
    #[arg(long)]
    sort: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    process::export_taxonomy(&args.output, args.familia.as_deref(), args.sort).await
}
