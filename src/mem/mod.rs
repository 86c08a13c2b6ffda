//! 固件堆
//!
//! 控制器集合（[`Fleet`](crate::drivers::Fleet)）用 `Vec` 存放控制器，
//! 裸机固件需要一个全局分配器。启用 `embedded-alloc` 时由这里提供，
//! 测试和主机构建使用标准库分配器。

mod heap;

pub use heap::{heap_free, heap_used, init_heap};
