use clap::Parser;
use ecg_scan::{analyzer, cli, config, error, report, scanner, server, session};
use cli::{Cli, Commands};
use config::Config;
use ecg_scan_common::{catalog, NoticeKind};
use error::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "ecg_scan=debug" } else { "ecg_scan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url.clone() {
        config.base_url = url;
        config.validate()?;
    }

    match cli.command {
        Commands::Analyze { path, encoding, no_save, output, mock_delay_ms } => {
            println!("🫀 ecg-scan - 心電図解析\n");

            let images = scanner::scan_path(&path)?;
            if images.is_empty() {
                return Err(error::EcgScanError::NoImagesFound(path.display().to_string()));
            }
            println!("✔ {}件の画像を検出\n", images.len());

            let mut service = analyzer::AnalysisService::new(&config);
            if let Some(encoding) = encoding {
                service = service.with_encoding(encoding);
            }
            if let Some(ms) = mock_delay_ms {
                service = service.with_mock_delay(Duration::from_millis(ms));
            }

            let mut session = session::AnalysisSession::new(&service)
                .with_save(!no_save)
                .with_progress(true);

            let mut records = Vec::new();
            for image in &images {
                println!("▶ {}", image.file_name);
                let outcome = session.run(image).await;

                for notice in &outcome.notices {
                    let mark = match notice.kind {
                        NoticeKind::Info => "✔",
                        NoticeKind::Destructive => "✖",
                    };
                    println!("  {} {}: {}", mark, notice.title, notice.description);
                }

                if let Some(result) = &outcome.result {
                    println!();
                    println!("{}", report::format_result(result));
                }
                if let Some(saved) = &outcome.saved {
                    println!("  履歴に保存: {} ({})\n", saved.id, report::format_date(&saved.date));
                }

                records.push(serde_json::json!({
                    "fileName": outcome.file_name,
                    "result": outcome.result,
                    "saved": outcome.saved,
                }));
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&records)?;
                std::fs::write(&output, json)?;
                println!("✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::History { json, risk } => {
            let service = analyzer::AnalysisService::new(&config);
            let entries = report::filter_history(service.fetch_history().await, risk);

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", report::format_history(&entries));
            }
        }

        Commands::Conditions { name } => match name {
            Some(name) => match catalog::condition_by_name(&name) {
                Some(condition) => print!("{}", report::format_condition(condition)),
                None => println!("カタログに該当する疾患がありません: {}", name),
            },
            None => {
                for condition in catalog::all() {
                    println!(
                        "{:<28} {:<12} baseline {}%",
                        condition.name,
                        condition.risk.badge(),
                        condition.baseline
                    );
                }
            }
        },

        Commands::Serve { addr, delay_ms } => {
            println!("🫀 ecg-scan - モックバックエンド http://{}/api\n", addr);
            let state = server::AppState::new(Duration::from_millis(delay_ms));
            server::serve(addr, state).await?;
        }

        Commands::Config { set_base_url, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!("  疎通確認タイムアウト: {}ms", config.probe_timeout_ms);
                println!("  リクエストタイムアウト: {}ms", config.request_timeout_ms);
                println!("  モック待ち時間: {}ms", config.mock_delay_ms);
                println!("  送信形式: {:?}", config.encoding);
            }
        }
    }

    Ok(())
}
