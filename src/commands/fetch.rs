use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::FetchArgs;
use crate::common::{download_big_file, ensure_dir_exists, fetch_json, remote_file_exists};

/// Release metadata for one country/level, as served by the geoBoundaries API.
#[derive(Debug, Deserialize)]
struct ReleaseMeta {
    #[serde(rename = "gjDownloadURL")]
    gj_download_url: String,
    #[serde(rename = "boundaryYearRepresented", default)]
    boundary_year: Option<serde_json::Value>,
}

/// Download the open-license ADM boundary files for one country.
pub fn run(cli: &crate::cli::Cli, args: &FetchArgs) -> Result<()> {
    let iso = args.iso.to_ascii_uppercase();
    if iso.len() != 3 || !iso.bytes().all(|b| b.is_ascii_alphabetic()) {
        bail!("expected a three-letter ISO code (e.g. IND), got {:?}", args.iso);
    }
    if args.levels.is_empty() || args.levels.iter().any(|l| !(1..=3).contains(l)) {
        bail!("--levels accepts values 1..=3");
    }

    ensure_dir_exists(&args.out)?;

    for level in &args.levels {
        let meta_url = format!(
            "https://www.geoboundaries.org/api/current/gbOpen/{iso}/ADM{level}/"
        );
        let meta: ReleaseMeta = fetch_json(&meta_url)
            .with_context(|| format!("no ADM{level} release for {iso}"))?;

        let out_path = args.out.join(format!("{}_adm{level}.geojson", iso.to_ascii_lowercase()));

        if cli.verbose > 0 {
            let year = meta
                .boundary_year
                .as_ref()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "?".into());
            eprintln!(
                "[fetch:adm{level}] {} (year {year}) -> {}",
                meta.gj_download_url,
                out_path.display()
            );
        }

        // The API occasionally advertises a release whose asset is gone.
        if !remote_file_exists(&meta.gj_download_url)? {
            bail!("ADM{level} release asset for {iso} is missing upstream: {}", meta.gj_download_url);
        }

        download_big_file(&meta.gj_download_url, &out_path, args.force)?;
    }

    println!(
        "Fetched ADM {:?} for {} into {}",
        args.levels,
        iso,
        args.out.display()
    );
    Ok(())
}
