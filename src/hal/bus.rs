//! # 寄存器总线
//!
//! 所有寄存器访问都是 `base_address + offset` 上的 32 位读写。
//! [`RegisterBus`] 是协议层与具体总线之间唯一的接缝：
//!
//! - [`Mmio`]: 真实硬件，volatile 指针访问
//! - [`crate::sim::SimBus`]: 仿真总线，记录访问顺序，供测试使用

/// 32 位寄存器总线
///
/// 方法只取 `&self`：多个实例的驱动共享同一条总线，
/// 但各自只访问自己不相交的寄存器窗口。
pub trait RegisterBus {
    /// 读 32 位寄存器
    fn read32(&self, addr: usize) -> u32;

    /// 写 32 位寄存器
    fn write32(&self, addr: usize, value: u32);

    /// 读-改-写
    ///
    /// 多字段寄存器（CPOL/CPHA、SS/ENABLE 等）必须走这里，
    /// 保证写一个字段不会覆盖同一寄存器中的其他字段。
    #[inline]
    fn modify32<F>(&self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(addr);
        self.write32(addr, f(value));
    }

    /// 置位
    #[inline]
    fn set_bits32(&self, addr: usize, mask: u32) {
        self.modify32(addr, |v| v | mask);
    }

    /// 清位
    #[inline]
    fn clear_bits32(&self, addr: usize, mask: u32) {
        self.modify32(addr, |v| v & !mask);
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    #[inline]
    fn read32(&self, addr: usize) -> u32 {
        (**self).read32(addr)
    }

    #[inline]
    fn write32(&self, addr: usize, value: u32) {
        (**self).write32(addr, value)
    }

    #[inline]
    fn modify32<F>(&self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        (**self).modify32(addr, f)
    }
}

/// 内存映射总线
///
/// 地址即物理地址，直接做 volatile 访问。
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// 创建 MMIO 总线
    ///
    /// # Safety
    ///
    /// 调用者保证之后通过此总线访问的每个地址都是已映射、4 字节对齐的
    /// 外设寄存器，并且没有其他代码在不同步的情况下访问同一窗口。
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read32(&self, addr: usize) -> u32 {
        // Safety: 构造 Mmio 时调用者已保证地址有效
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write32(&self, addr: usize, value: u32) {
        // Safety: 同上
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    #[cfg(feature = "critical-section")]
    #[inline]
    fn modify32<F>(&self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        critical_section::with(|_| {
            let value = self.read32(addr);
            self.write32(addr, f(value));
        })
    }
}
