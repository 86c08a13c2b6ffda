//! UART 收发器寄存器

crate::register_block! {
    /// UART 寄存器块
    pub struct UartRegs {
        /// 接收数据，bit 8:0
        rxdata @ 0x0000,
        /// 发送数据，bit 8:0，每个字符一次写
        txdata @ 0x0004,
        /// 预分频，bit 15:0
        pr @ 0x0008,
        ctrl @ 0x000C,
        cfg @ 0x0010,
        match_reg @ 0x001C,
        rx_fifo_level @ 0xFE00,
        rx_fifo_threshold @ 0xFE04,
        rx_fifo_flush @ 0xFE08,
        /// 发送 FIFO 中尚未移出的字符数
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
    /// CTRL 寄存器，各使能位独立
    pub struct Ctrl(u32) {
        /// 模块使能
        en: 0,
        txen: 1,
        rxen: 2,
        /// 回环
        lpen: 3,
        /// 毛刺滤波
        gfen: 4,
    }
}

crate::bitfield! {
    /// CFG 寄存器
    pub struct Cfg(u32) {
        wlen: 0..=3,
        stp2: 4,
        parity: 5..=7,
        timeout: 8..=13,
    }
}
