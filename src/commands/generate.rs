//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Build the index and render the site into the public directory
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let index = folio.build_index()?;
    tracing::info!("Loaded {} articles", index.len());

    let generator = Generator::new(&folio.config)?;
    generator.generate(&index, &folio.public_dir)?;

    let elapsed = start.elapsed();
    tracing::info!("Generated in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
