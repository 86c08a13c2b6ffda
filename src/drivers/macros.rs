//! # 寄存器定义宏
//!
//! 提供两个宏来描述外设的寄存器映射：
//!
//! - [`register_block!`](crate::register_block): 偏移常量 + 寄存器块访问器
//! - [`bitfield!`](crate::bitfield): 寄存器位域（单比特或多比特字段）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use neon_periph::{register_block, bitfield};
//!
//! register_block! {
//!     /// UART 寄存器块
//!     pub struct UartRegs {
//!         txdata @ 0x0004,
//!         ctrl @ 0x000C,
//!     }
//! }
//!
//! bitfield! {
//!     pub struct Ctrl(u32) {
//!         en: 0,
//!         txen: 1,
//!     }
//! }
//!
//! let regs = UartRegs::new(&bus, 0x3000_0000);
//! regs.modify_ctrl(|v| Ctrl::from_raw(v).with_txen(true).raw());
//! ```

/// 定义寄存器块的宏
///
/// # 语法
///
/// ```rust,ignore
/// register_block! {
///     pub struct BlockName {
///         reg_name @ offset,
///         ...
///     }
/// }
/// ```
///
/// # 生成内容
///
/// - 模块级偏移常量 `REG_NAME`
/// - 借用总线的块结构体 `BlockName<'a, B>`
/// - 每个寄存器的读取方法 `reg_name()`
/// - 每个寄存器的写入方法 `write_reg_name()`
/// - 每个寄存器的读改写方法 `modify_reg_name()`
/// - 每个寄存器的地址方法 `reg_name_addr()`
#[macro_export]
macro_rules! register_block {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$reg_meta:meta])*
                $reg_name:ident @ $offset:expr
            ),* $(,)?
        }
    ) => {
        $(
            $crate::paste::paste! {
                $(#[$reg_meta])*
                pub const [<$reg_name:upper>]: usize = $offset;
            }
        )*

        $(#[$meta])*
        pub struct $name<'a, B: $crate::hal::bus::RegisterBus + ?Sized> {
            bus: &'a B,
            base: usize,
        }

        impl<'a, B: $crate::hal::bus::RegisterBus + ?Sized> $name<'a, B> {
            /// 在 `base` 处创建寄存器块
            #[inline]
            pub fn new(bus: &'a B, base: usize) -> Self {
                Self { bus, base }
            }

            /// 获取基地址
            #[inline]
            pub const fn base_addr(&self) -> usize {
                self.base
            }

            $(
                $crate::paste::paste! {
                    /// 读取寄存器值
                    #[inline]
                    pub fn $reg_name(&self) -> u32 {
                        <B as $crate::hal::bus::RegisterBus>::read32(self.bus, self.base + $offset)
                    }

                    /// 写入寄存器值
                    #[inline]
                    pub fn [<write_ $reg_name>](&self, value: u32) {
                        <B as $crate::hal::bus::RegisterBus>::write32(self.bus, self.base + $offset, value)
                    }

                    /// 读-改-写寄存器
                    #[inline]
                    pub fn [<modify_ $reg_name>]<F: FnOnce(u32) -> u32>(&self, f: F) {
                        <B as $crate::hal::bus::RegisterBus>::modify32(self.bus, self.base + $offset, f)
                    }

                    /// 获取寄存器地址
                    #[inline]
                    pub const fn [<$reg_name _addr>](&self) -> usize {
                        self.base + $offset
                    }
                }
            )*
        }
    };
}

/// 定义位域的宏
///
/// 字段写成 `name: bit` 是单比特（`bool`），写成 `name: lo..=hi` 是多比特数值。
///
/// # 示例
///
/// ```rust,ignore
/// bitfield! {
///     /// UART 配置寄存器
///     pub struct Cfg(u32) {
///         /// 字长
///         wlen: 0..=3,
///         /// 两个停止位
///         stp2: 4,
///     }
/// }
/// ```
#[macro_export]
macro_rules! bitfield {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($type:ty) {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $bit:tt $(..= $end_bit:tt)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name($type);

        impl $name {
            /// 从原始值创建
            pub const fn from_raw(value: $type) -> Self {
                Self(value)
            }

            /// 获取原始值
            pub const fn raw(&self) -> $type {
                self.0
            }

            $(
                $crate::bitfield!(@field $type, $(#[$field_meta])* $field: $bit $(..= $end_bit)?);
            )*
        }

        impl From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $type {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("raw", &self.0)
                    $(
                        .field(stringify!($field), &self.$field())
                    )*
                    .finish()
            }
        }
    };

    // 单比特字段
    (@field $type:ty, $(#[$field_meta:meta])* $field:ident: $bit:tt) => {
        $crate::paste::paste! {
            /// 字段掩码
            pub const [<$field:upper _MASK>]: $type = 1 << $bit;

            $(#[$field_meta])*
            #[inline]
            pub const fn $field(&self) -> bool {
                (self.0 >> $bit) & 1 != 0
            }

            /// 返回设置了该字段的新值
            #[inline]
            pub const fn [<with_ $field>](self, value: bool) -> Self {
                if value {
                    Self(self.0 | (1 << $bit))
                } else {
                    Self(self.0 & !(1 << $bit))
                }
            }

            /// 设置位域
            #[inline]
            pub fn [<set_ $field>](&mut self, value: bool) {
                *self = self.[<with_ $field>](value);
            }
        }
    };

    // 多比特字段
    (@field $type:ty, $(#[$field_meta:meta])* $field:ident: $lo:tt ..= $hi:tt) => {
        $crate::paste::paste! {
            /// 字段掩码
            pub const [<$field:upper _MASK>]: $type = ((1 << ($hi - $lo + 1)) - 1) << $lo;

            /// 字段最大值
            pub const [<$field:upper _MAX>]: $type = (1 << ($hi - $lo + 1)) - 1;

            $(#[$field_meta])*
            #[inline]
            pub const fn $field(&self) -> $type {
                (self.0 & Self::[<$field:upper _MASK>]) >> $lo
            }

            /// 返回设置了该字段的新值（超出宽度的高位被截掉）
            #[inline]
            pub const fn [<with_ $field>](self, value: $type) -> Self {
                let mask = Self::[<$field:upper _MASK>];
                Self((self.0 & !mask) | ((value << $lo) & mask))
            }

            /// 设置位域
            #[inline]
            pub fn [<set_ $field>](&mut self, value: $type) {
                *self = self.[<with_ $field>](value);
            }
        }
    };
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    bitfield! {
        /// 测试状态寄存器
        pub struct TestStatus(u32) {
            /// 位 0
            bit0: 0,
            /// 位 1
            bit1: 1,
            /// 位 4..7
            nibble: 4..=7,
        }
    }

    #[test]
    fn test_bitfield() {
        let status = TestStatus::from_raw(0b1010_0011);

        assert!(status.bit0());
        assert!(status.bit1());
        assert_eq!(status.nibble(), 0b1010);

        let mut status = TestStatus::from_raw(0);
        status.set_bit0(true);
        assert!(status.bit0());
        assert_eq!(status.raw(), 1);
    }

    #[test]
    fn test_multi_bit_field_keeps_neighbours() {
        let s = TestStatus::from_raw(0b0000_0011).with_nibble(0x1F);
        // 高位被截掉，低两位不受影响
        assert_eq!(s.raw(), 0b1111_0011);
        assert_eq!(TestStatus::NIBBLE_MAX, 0xF);
        assert_eq!(TestStatus::NIBBLE_MASK, 0xF0);
        assert_eq!(TestStatus::BIT1_MASK, 0b10);
    }

    #[test]
    fn test_bitfield_conversion() {
        let status: TestStatus = 0x55u32.into();
        let raw: u32 = status.into();
        assert_eq!(raw, 0x55);
    }
}
