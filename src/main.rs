use clap::Parser;
use scanverify::{cli, config, error, logging, recognizer, replay, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use scanverify_common::{label, BarcodeStatus};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Recognize { image, data_uri, model, json } => {
            let client = recognizer::client_from_config(&config, model.as_deref())?;

            let output = match (image, data_uri) {
                (_, Some(uri)) => recognizer::recognize_data_uri(&client, &uri).await?,
                (Some(path), None) => {
                    let photo = scanner::load_photo(&path)?;
                    client.recognize(&photo).await?
                }
                (None, None) => {
                    return Err(error::ScanVerifyError::Config(
                        "画像ファイルまたは --data-uri を指定してください".into(),
                    ))
                }
            };

            if json {
                println!("{}", serde_json::to_string(&output)?);
            } else {
                let mark = if output.serial_number == config.approved_serial { "✔ approved" } else { "✖ rejected" };
                println!("{}  ({})", output.serial_number, mark);
            }
        }

        Commands::RecognizeDir { folder, output, model } => {
            println!("🔎 scanverify - 一括認識\n");

            println!("[1/3] 写真をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            println!("✔ {}枚の写真を検出\n", images.len());

            if images.is_empty() {
                return Err(error::ScanVerifyError::NoImagesFound(
                    folder.display().to_string()
                ));
            }

            println!("[2/3] AI認識中...");
            let client = recognizer::client_from_config(&config, model.as_deref())?;
            let records = recognizer::recognize_images(&client, &images, &config.approved_serial, cli.verbose).await;
            let failed = records.iter().filter(|r| r.error.is_some()).count();
            println!("✔ 認識完了（失敗 {}件）\n", failed);

            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join("serials.json"));
            std::fs::write(&output, serde_json::to_string_pretty(&records)?)?;
            println!("✔ 結果を保存: {}", output.display());
        }

        Commands::Replay { log, approved, json } => {
            let log = replay::FrameLog::load(&log)?;
            let approved = approved.unwrap_or_else(|| config.approved_serial.clone());
            let report = replay::run_replay(log, &approved).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if let Some(message) = &report.error {
                println!("✖ スキャンを開始できません: {}", message);
            }

            for frame in &report.frames {
                if let Some(message) = &frame.error {
                    println!("  frame {:>4}: skipped ({})", frame.index, message);
                    continue;
                }
                let items: Vec<String> = frame
                    .barcodes
                    .iter()
                    .map(|b| format!("{} [{}]", label(b), b.status))
                    .collect();
                println!("  frame {:>4}: {}", frame.index, items.join(", "));
            }

            let approved_count = report.records.iter().filter(|r| r.status == BarcodeStatus::Approved).count();
            println!(
                "\n✅ {}フレーム / {}件（承認 {}件・スキップ {}フレーム）",
                report.frames.len(),
                report.records.len(),
                approved_count,
                report.skipped_frames
            );
        }

        Commands::Config { set_api_key, set_approved, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(serial) = set_approved {
                config.approved_serial = serial;
                config.save()?;
                println!("✔ 承認済みシリアル番号を設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  承認済みシリアル番号: {}", config.approved_serial);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
