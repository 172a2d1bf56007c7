use anyhow::Result;
use clap::Parser;
use outfit_generator::codec;
use outfit_generator::models::{Config, OccasionTheme, OutfitResult};
use outfit_generator::pipeline::OutfitPipeline;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "outfit-generator")]
#[command(about = "Style a clothing item onto your photo for an occasion")]
struct CliArgs {
    /// Photo of the person to style.
    #[arg(long, value_name = "PATH")]
    user: PathBuf,

    /// Photo of the clothing item.
    #[arg(long, value_name = "PATH")]
    clothing: PathBuf,

    /// Occasion: casual, business, date-night, party, formal, or gym.
    #[arg(long, value_parser = parse_theme_arg)]
    theme: OccasionTheme,

    /// Where to write the generated image.
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn parse_theme_arg(input: &str) -> std::result::Result<OccasionTheme, String> {
    input.parse().map_err(|_| {
        let expected: Vec<&str> = OccasionTheme::ALL.iter().map(|t| t.slug()).collect();
        format!(
            "Invalid theme '{}'. Expected one of: {}",
            input,
            expected.join(", ")
        )
    })
}

/// Default output name, with the extension taken from the image bytes.
fn default_output_path(bytes: &[u8]) -> PathBuf {
    let extension = image::ImageFormat::from_mime_type(codec::sniff_image_mime(bytes))
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("png");
    PathBuf::from(format!("outfit_{}.{}", Uuid::new_v4(), extension))
}

async fn write_result(
    result: &OutfitResult,
    output: Option<&Path>,
) -> outfit_generator::Result<PathBuf> {
    let bytes = codec::decode(&result.image_base64)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(&bytes));
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        error!("Failed to write {}: {}", path.display(), e);
        outfit_generator::Error::Io(e)
    })?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outfit_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    info!("Styling {} for {}", args.clothing.display(), args.theme);

    let pipeline = match Config::from_env().and_then(|c| OutfitPipeline::from_config(&c)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to initialize generator: {}", e);
            std::process::exit(1);
        }
    };

    let blobs = tokio::try_join!(
        codec::read_blob(&args.user),
        codec::read_blob(&args.clothing)
    );
    let outcome = match blobs {
        Ok((user, clothing)) => pipeline.run(user, clothing, args.theme).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => match write_result(&result, args.output.as_deref()).await {
            Ok(path) => {
                info!("Saved generated look to {}", path.display());
                println!("{}", result.description);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e.kind().user_message());
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Generation failed: {}", e);
            eprintln!("{}", e.kind().user_message());
            std::process::exit(1);
        }
    }
}
