//! Offline preview of resolved metadata and catalog searches.

use anyhow::Context;
use std::path::Path;

use crate::catalog::MatchTier;
use crate::config::Config;
use crate::metadata::{LoftyTagReader, MetadataResolver, Resolution};
use crate::model::MetadataSource;
use crate::scanner;

/// Print what each file resolves to and the searches that would be issued
pub fn cmd_resolve(config: &Config, path: &Path, recursive: bool) -> anyhow::Result<()> {
    let files = scanner::discover(path, recursive, &config.matching.extensions)
        .with_context(|| format!("Cannot read folder {}", path.display()))?;

    println!("Resolving {} files in {}", files.len(), path.display());
    println!();

    let resolver = MetadataResolver::new(LoftyTagReader);
    let mut untitled = 0;

    for file in &files {
        println!("{}", file.file_name);
        match resolver.resolve(file) {
            Resolution::Identified { metadata, source } => {
                let source = match source {
                    MetadataSource::Tags => "tags",
                    MetadataSource::Filename => "file name",
                };
                println!("  Artist: {}", metadata.artist_or_unknown());
                println!("  Title:  {}", metadata.title.as_deref().unwrap_or_default());
                println!("  Source: {}", source);
                for tier in MatchTier::ALL {
                    if let Some(query) = tier.build_query(&metadata) {
                        println!("  {:<16} {}", tier.to_string(), query.to_query_string());
                    }
                }
            }
            Resolution::NoTitle => {
                untitled += 1;
                println!("  (no usable title - would be skipped)");
            }
        }
        println!();
    }

    println!(
        "{} of {} files have a usable title",
        files.len() - untitled,
        files.len()
    );
    Ok(())
}
