//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: Dispatcher の構築とワイヤリング
//! - **Dispatcher / DispatchHandle**: main thread での drain と、任意スレッドからの dispatch
//! - **MainLoop**: 固定間隔の tick ループ
//! - **global**: プロセス全体の Dispatcher（明示的な init が必要）
//! - **status**: DrainReport / DispatcherStats

pub mod builder;
pub mod dispatcher;
pub mod global;
pub mod main_loop;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::DispatcherBuilder;
pub use self::dispatcher::{DispatchHandle, Dispatcher};
pub use self::main_loop::MainLoop;
pub use self::status::{DispatcherStats, DrainReport};
