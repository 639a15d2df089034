pub mod frame;
pub mod handle;
pub mod pool;
pub mod strategy;

pub use handle::PageHandle;
pub use pool::BufferPool;
