use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::boundary::{AdmLevel, BoundaryFeature};
use crate::cli::ResolveArgs;
use crate::common::{assert_not_stdout, ensure_dir_exists};
use crate::hierarchy::{link_to_parent, Cascade, CandidateIndex, GroupTable, LevelMatcher, Outcome, ResolveStats};
use crate::io::{read_features, FeatureStream};

pub fn run(cli: &crate::cli::Cli, args: &ResolveArgs) -> Result<()> {
    assert_not_stdout(&args.out)?;
    ensure_dir_exists(&args.out)?;

    let states = load(&args.adm1, AdmLevel::Adm1, args.simplify, cli.verbose)?;
    let districts = load(&args.adm2, AdmLevel::Adm2, args.simplify, cli.verbose)?;

    let state_index = CandidateIndex::build(&states.0);
    let state_matcher = LevelMatcher::new(&states.0, &state_index);

    // Pass A: link every district straight to its state. The outcomes feed
    // both the adm2 output and the grouping table the deeper cascade needs.
    let mut adm2_stats = ResolveStats { skipped: districts.1, ..Default::default() };
    let mut stream = FeatureStream::create(&args.out.join("adm2_resolved.geojson"), args.force)?;
    let mut district_outcomes: Vec<Outcome> = Vec::with_capacity(districts.0.len());
    for district in &districts.0 {
        let outcome = link_to_parent(district, &state_matcher, &mut adm2_stats);
        stream.append(district, &outcome)?;
        district_outcomes.push(outcome);
    }
    let written = stream.close()?;
    info!("adm2 pass: {written} records written ({adm2_stats})");

    // Pass B: the two-level cascade for sub-districts, with districts
    // grouped by the parent name they resolved to above.
    let mut adm3_stats = ResolveStats::default();
    if let Some(adm3_path) = &args.adm3 {
        let children = load(adm3_path, AdmLevel::Adm3, args.simplify, cli.verbose)?;
        adm3_stats.skipped = children.1;

        let groups = GroupTable::build(&districts.0, |idx| district_outcomes[idx].parent_name());
        let cascade = Cascade::new(&states.0, &state_index, &districts.0, &groups);

        let mut stream = FeatureStream::create(&args.out.join("adm3_resolved.geojson"), args.force)?;
        for child in &children.0 {
            let outcome = cascade.resolve(child, &mut adm3_stats);
            stream.append(child, &outcome)?;
        }
        let written = stream.close()?;
        info!("adm3 pass: {written} records written ({adm3_stats})");
    }

    if state_index.dropped() > 0 {
        info!("{} state candidates had no computable box", state_index.dropped());
    }
    println!(
        "Resolved {} districts ({adm2_stats}) and {} sub-districts ({adm3_stats}) -> {}",
        adm2_stats.resolved(),
        adm3_stats.resolved(),
        args.out.display()
    );
    Ok(())
}

type Loaded = (Vec<BoundaryFeature>, usize);

fn load(path: &Path, level: AdmLevel, simplify: Option<f64>, verbose: u8) -> Result<Loaded> {
    let (mut features, skipped) = read_features(path, level)
        .with_context(|| format!("load {} dataset", level.to_str()))?;
    if let Some(tolerance) = simplify {
        for feature in &mut features {
            feature.simplify(tolerance);
        }
    }
    if verbose > 0 {
        eprintln!(
            "[load:{}] {} features ({} skipped) from {}",
            level.to_str(),
            features.len(),
            skipped,
            path.display()
        );
    }
    Ok((features, skipped))
}
