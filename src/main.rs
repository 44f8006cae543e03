use invitegen::{
    logger::{self, LoggerConfig},
    CeremonyFacts, Config, DesignOptions, InvitationPipeline, Person, Tone, Venue,
};
use std::env;
use std::fs;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn read_image(path: Option<&String>) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error>> {
    match path.filter(|p| !p.is_empty() && p.as_str() != "-") {
        Some(p) => {
            let bytes = fs::read(p)?;
            log::info!("📁 Loaded {} ({} bytes)", p, bytes.len());
            Ok(Some(bytes))
        }
        None => Ok(None),
    }
}

/// Usage: invitegen [style.png|-] [photo.jpg|-] [backend]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::from_env())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env()?;
    logger::log_config_info(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    let style_image = read_image(args.first())?;
    let photo_image = read_image(args.get(1))?;
    let backend = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| env_or("IMAGE_BACKEND", "image-only"));

    let mut venue = Venue::new(
        env_or("VENUE_NAME", "서울 웨딩홀"),
        env_or("VENUE_ADDRESS", "서울특별시 강남구 테헤란로 123"),
    );
    if let (Ok(lat), Ok(lon)) = (env::var("VENUE_LAT"), env::var("VENUE_LON")) {
        venue = venue.with_coordinates(lat.parse()?, lon.parse()?);
    }

    let tone: Tone = env_or("INVITATION_TONE", "warm").parse()?;
    let facts = CeremonyFacts::new(
        Person::new(env_or("GROOM_NAME", "철수")),
        Person::new(env_or("BRIDE_NAME", "영희")),
        venue,
        env_or("WEDDING_DATE", "2025-05-17"),
        env_or("WEDDING_TIME", "12:30"),
    )
    .with_tone(tone);

    let mut design = DesignOptions::new();
    if let Ok(frame) = env::var("INVITATION_FRAME") {
        design = design.with_frame(frame);
    }
    if let Ok(request) = env::var("INVITATION_REQUEST") {
        design = design.with_additional_request(request);
    }

    log::info!("🔄 Building invitation pipeline...");
    let pipeline = match InvitationPipeline::from_config(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("❌ Failed to initialize pipeline: {}", e);
            return Err(e.into());
        }
    };

    let result = pipeline
        .create_invitation(&facts, style_image, photo_image, &design, &backend)
        .await?;

    if result.placeholder_count() > 0 {
        log::warn!(
            "⚠️  {} page(s) use the placeholder image",
            result.placeholder_count()
        );
    } else {
        log::info!("✅ All pages generated with {}", result.backend_used);
    }

    if let (Some(editor), Ok(request)) = (pipeline.editor(), env::var("EDIT_REQUEST")) {
        log::info!("🔄 Applying edit request...");
        let edited = editor
            .edit_invitation(result.pages.clone(), &request, None)
            .await?;
        println!("{}", serde_json::to_string_pretty(&edited)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
