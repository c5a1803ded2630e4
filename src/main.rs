//! Host-side helper: `holo-snapshot` renders every layer of a parameter set
//! on the CPU and writes one PNG per role.
//!
//! ```bash
//! holo-snapshot --query "geometry=4&density=1.2&hue=200" --time-ms 2500 --out shots/
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use holo_layers::frame::{render_rgba, FrameUniforms, RowOrder};
    use holo_layers::interaction::InteractionTracker;
    use holo_layers::layers::derive_all;
    use holo_layers::ParameterSet;

    /// Render the five holographic layers to PNG files
    #[derive(Parser)]
    #[command(name = "holo-snapshot")]
    #[command(version)]
    struct Cli {
        /// Parameters as a query string (`geometry=4&density=1.2&...`)
        #[arg(long, conflicts_with = "json")]
        query: Option<String>,

        /// Parameters as a JSON file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Elapsed session time in milliseconds
        #[arg(long, default_value_t = 0.0)]
        time_ms: f64,

        #[arg(long, default_value_t = 320)]
        width: u32,

        #[arg(long, default_value_t = 240)]
        height: u32,

        /// Pointer position in normalised viewport coordinates (`u,v`)
        #[arg(long, value_parser = parse_pointer)]
        pointer: Option<Vec2>,

        /// Clicks applied before the frame is rendered
        #[arg(long, default_value_t = 0)]
        clicks: u32,

        /// Output directory
        #[arg(long, default_value = "snapshots")]
        out: PathBuf,
    }

    fn parse_pointer(s: &str) -> Result<Vec2, String> {
        let (u, v) = s.split_once(',').ok_or("expected u,v")?;
        let u: f32 = u.trim().parse().map_err(|e| format!("{e}"))?;
        let v: f32 = v.trim().parse().map_err(|e| format!("{e}"))?;
        Ok(Vec2::new(u, v))
    }

    fn load_params(cli: &Cli) -> Result<ParameterSet> {
        if let Some(path) = &cli.json {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return ParameterSet::from_json(&text)
                .with_context(|| format!("parsing {}", path.display()));
        }
        Ok(cli
            .query
            .as_deref()
            .map(ParameterSet::from_query)
            .unwrap_or_default())
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        anyhow::ensure!(cli.width > 0 && cli.height > 0, "image size must be non-zero");

        let params = load_params(&cli)?;
        log::info!("rendering {} ({})", params.to_query(), params.geometry().name());

        let mut tracker = InteractionTracker::default();
        if let Some(p) = cli.pointer {
            tracker.pointer_move(p.x, p.y, 0.0, 0.0);
        }
        for _ in 0..cli.clicks {
            tracker.click();
        }

        std::fs::create_dir_all(&cli.out)
            .with_context(|| format!("creating {}", cli.out.display()))?;

        for (role, layer_params) in derive_all(&params) {
            let uniforms = FrameUniforms::new(
                &layer_params,
                &tracker.snapshot(role),
                cli.time_ms,
                cli.width,
                cli.height,
            );
            let pixels = render_rgba(&uniforms, cli.width, cli.height, RowOrder::TopDown);
            let image = image::RgbaImage::from_raw(cli.width, cli.height, pixels)
                .context("pixel buffer does not match image size")?;
            let path = cli.out.join(format!("{role}.png"));
            image
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("{role}: {}", path.display());
        }
        println!("wrote {} layers to {}", derive_all(&params).len(), cli.out.display());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

// The binary has nothing to do in the browser build.
#[cfg(target_arch = "wasm32")]
fn main() {}
