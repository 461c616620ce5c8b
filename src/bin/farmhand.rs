//! One-shot command-line client for a farmer-support backend.
//!
//! Diagnostics go to stderr so stdout carries only the fetched data.

use std::sync::Arc;

use farmhand::config::ClientConfig;
use farmhand::conversation::ConversationController;
use farmhand::gateway::{Backend, HttpGateway};
use farmhand::geo::FixedLocator;
use farmhand::listing::{MarketPriceController, MarketPriceSource, VideoController, VideoSource};
use farmhand::weather::{WeatherController, WeatherPhase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "help".to_owned());

    let config_path = ClientConfig::default_config_path();
    let config = if config_path.exists() {
        ClientConfig::from_file(&config_path)?
    } else {
        ClientConfig::default()
    };
    tracing::info!(backend = %config.backend.base_url, "farmhand starting");

    let gateway: Arc<dyn Backend> = Arc::new(HttpGateway::new(&config.backend)?);

    match command.as_str() {
        "ask" => {
            let question = args.collect::<Vec<_>>().join(" ");
            let mut chat = ConversationController::new(gateway);
            if !chat.submit(&question).await {
                anyhow::bail!("nothing to ask: the question was empty");
            }
            for turn in chat.transcript() {
                println!("{}: {}", turn.role, turn.text);
            }
        }
        "prices" => {
            let mut prices = MarketPriceController::new(MarketPriceSource::new(gateway));
            prices.load().await;
            if let Some(message) = prices.error() {
                anyhow::bail!("{message}");
            }
            for quote in prices.items() {
                println!(
                    "{}: {} {} ({})",
                    quote.name,
                    quote.basis.amount(),
                    quote.unit,
                    quote.market
                );
            }
        }
        "videos" => {
            let category = args.next().unwrap_or_default();
            let mut videos = VideoController::new(VideoSource::new(gateway));
            videos.set_filter(&category).await;
            if let Some(message) = videos.error() {
                anyhow::bail!("{message}");
            }
            for video in videos.items() {
                println!("[{}] {} ({}) — {}", video.category, video.title, video.duration, video.url);
            }
        }
        "weather" => {
            let locator = Arc::new(FixedLocator::from_config(&config.location));
            let mut weather = WeatherController::new(gateway, locator);
            weather.request_weather().await;
            match weather.phase() {
                WeatherPhase::Succeeded => {
                    let report = weather
                        .report()
                        .ok_or_else(|| anyhow::anyhow!("weather report missing after success"))?;
                    println!(
                        "{} — {}°C, humidity {}%, wind {} m/s",
                        report.weather.description,
                        report.weather.temperature,
                        report.weather.humidity,
                        report.weather.wind_speed
                    );
                    for day in &report.forecast {
                        println!("{}: {} ({}° / {}°)", day.day, day.description, day.temp_max, day.temp_min);
                    }
                }
                _ => {
                    let message = weather.error().unwrap_or("weather fetch did not complete");
                    anyhow::bail!("{message}");
                }
            }
        }
        _ => {
            eprintln!("usage: farmhand <ask QUESTION... | prices | videos [CATEGORY] | weather>");
        }
    }

    Ok(())
}
