// ============================================================================
// 裸机：embedded-alloc 全局堆
// ============================================================================

#[cfg(all(feature = "embedded-alloc", not(test)))]
mod firmware {
    use core::alloc::{GlobalAlloc, Layout};
    use core::mem::MaybeUninit;

    use embedded_alloc::Heap;
    use spin::Once;

    use crate::config::HEAP_SIZE;

    #[repr(align(8))]
    struct Arena([MaybeUninit<u8>; HEAP_SIZE]);

    static mut ARENA: Arena = Arena([MaybeUninit::uninit(); HEAP_SIZE]);

    /// 第一次分配时才把 arena 交给 `Heap`
    struct OnDemandHeap {
        heap: Heap,
        ready: Once<()>,
    }

    impl OnDemandHeap {
        fn ensure_ready(&self) {
            self.ready.call_once(|| {
                let start = (&raw mut ARENA).cast::<u8>() as usize;
                // arena 只在这里交出一次
                unsafe { self.heap.init(start, HEAP_SIZE) };
            });
        }
    }

    unsafe impl GlobalAlloc for OnDemandHeap {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            self.ensure_ready();
            unsafe { self.heap.alloc(layout) }
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            unsafe { self.heap.dealloc(ptr, layout) }
        }
    }

    #[global_allocator]
    static ALLOCATOR: OnDemandHeap = OnDemandHeap {
        heap: Heap::empty(),
        ready: Once::new(),
    };

    pub fn init_heap() {
        ALLOCATOR.ensure_ready();
        crate::debug!("heap ready ({} bytes)", HEAP_SIZE);
    }

    pub fn heap_used() -> usize {
        ALLOCATOR.heap.used()
    }

    pub fn heap_free() -> usize {
        ALLOCATOR.heap.free()
    }
}

#[cfg(all(feature = "embedded-alloc", not(test)))]
pub use firmware::{heap_free, heap_used, init_heap};

// ============================================================================
// 主机 / 测试：标准库分配器
// ============================================================================

/// 标准库分配器无需初始化
#[cfg(not(all(feature = "embedded-alloc", not(test))))]
pub fn init_heap() {}

/// 主机上不统计
#[cfg(not(all(feature = "embedded-alloc", not(test))))]
pub fn heap_used() -> usize {
    0
}

#[cfg(not(all(feature = "embedded-alloc", not(test))))]
pub fn heap_free() -> usize {
    usize::MAX
}
