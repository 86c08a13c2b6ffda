//! SPI 主机寄存器

crate::register_block! {
    /// SPI 主机寄存器块
    pub struct SpiRegs {
        /// 接收数据，bit 7:0
        rxdata @ 0x0000,
        /// 发送数据，bit 7:0，MSB 先出
        txdata @ 0x0004,
        /// CPOL / CPHA
        cfg @ 0x0008,
        /// SS / ENABLE / RX_EN
        ctrl @ 0x000C,
        /// 预分频，bit 15:0
        pr @ 0x0010,
        status @ 0x0014,
        rx_fifo_level @ 0xFE00,
        rx_fifo_threshold @ 0xFE04,
        rx_fifo_flush @ 0xFE08,
        tx_fifo_level @ 0xFE10,
        tx_fifo_threshold @ 0xFE14,
        tx_fifo_flush @ 0xFE18,
        im @ 0xFF00,
        mis @ 0xFF04,
        ris @ 0xFF08,
        ic @ 0xFF0C,
        /// 时钟门控
        gclk @ 0xFF10,
    }
}

/// 寄存器映射占用的字节数
pub const REGISTER_SPAN: usize = GCLK + 4;

crate::bitfield! {
    /// CFG 寄存器，两个字段相互独立
    pub struct Cfg(u32) {
        /// 时钟极性
        cpol: 0,
        /// 时钟相位
        cpha: 1,
    }
}

crate::bitfield! {
    /// CTRL 寄存器
    pub struct Ctrl(u32) {
        /// 片选，置位时 CSB 拉低
        ss: 0,
        /// 数据引擎使能（每次事务开关，区别于 GCLK）
        enable: 1,
        rx_en: 2,
    }
}

crate::bitfield! {
    /// STATUS 寄存器
    pub struct Status(u32) {
        tx_e: 0,
        tx_f: 1,
        rx_e: 2,
        rx_f: 3,
        tx_b: 4,
        rx_a: 5,
        /// 移位进行中
        busy: 6,
    }
}
