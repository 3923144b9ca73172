use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scanverify")]
#[command(about = "バーコードのシリアル番号照合・静止画認識ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真1枚からシリアル番号を抽出
    Recognize {
        /// 写真ファイルのパス
        #[arg(required_unless_present = "data_uri", conflicts_with = "data_uri")]
        image: Option<PathBuf>,

        /// ファイルの代わりに Data URI を直接渡す
        #[arg(long)]
        data_uri: Option<String>,

        /// 使用するモデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,

        /// {"serialNumber": ...} 形式で出力
        #[arg(long)]
        json: bool,
    },

    /// フォルダ内の写真を1枚ずつ認識してJSONを出力
    RecognizeDir {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/serials.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 使用するモデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 記録済みフレームログを再生して判定結果を表示
    Replay {
        /// フレームログJSONファイル
        #[arg(required = true)]
        log: PathBuf,

        /// 承認済みシリアル番号（省略時は設定値）
        #[arg(short, long)]
        approved: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 承認済みシリアル番号を設定
        #[arg(long)]
        set_approved: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
