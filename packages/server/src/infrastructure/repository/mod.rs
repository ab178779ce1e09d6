//! Room Repository 実装
//!
//! - `inmemory`: HashMap を使ったプロセス内実装（再起動で全 Room が消える）

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
