use crate::config::UploadEncoding;
use clap::{Parser, Subcommand};
use ecg_scan_common::RiskLevel;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecg-scan")]
#[command(about = "ECG画像のAI解析（モック）・解析履歴ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ECG画像を解析して結果を表示・履歴に保存
    Analyze {
        /// 画像ファイル、または画像フォルダ
        #[arg(required = true)]
        path: PathBuf,

        /// 画像の送信形式 (multipart/base64)
        #[arg(short, long)]
        encoding: Option<UploadEncoding>,

        /// 履歴に保存しない
        #[arg(long)]
        no_save: bool,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// モック結果の待ち時間（ミリ秒）
        #[arg(long)]
        mock_delay_ms: Option<u64>,
    },

    /// 解析履歴を表示
    History {
        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// リスク区分で絞り込み (low/medium/high)
        #[arg(short, long)]
        risk: Option<RiskLevel>,
    },

    /// 疾患カタログを表示
    Conditions {
        /// 疾患名を指定して詳細表示
        #[arg(short, long)]
        name: Option<String>,
    },

    /// モック解析バックエンドを起動
    Serve {
        /// 待ち受けアドレス
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,

        /// 解析の疑似待ち時間（ミリ秒）
        #[arg(long, default_value = "2000")]
        delay_ms: u64,
    },

    /// 設定を表示/編集
    Config {
        /// ベースURLを保存
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_risk_filter_parses() {
        let cli = Cli::try_parse_from(["ecg-scan", "history", "--risk", "High"]).unwrap();
        match cli.command {
            Commands::History { risk, json } => {
                assert_eq!(risk, Some(RiskLevel::High));
                assert!(!json);
            }
            _ => panic!("historyコマンドではない"),
        }
    }

    #[test]
    fn test_history_risk_filter_rejects_unknown() {
        assert!(Cli::try_parse_from(["ecg-scan", "history", "--risk", "severe"]).is_err());
    }
}
