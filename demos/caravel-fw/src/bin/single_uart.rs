//! UART0 发送 "Hello\n"，不分配堆

#![no_std]
#![no_main]

use caravel_fw::{park, MgmtGpio, UserInterface, UserPads};
use neon_periph::config::{uart_pin_plan, UART_TOPOLOGY};
use neon_periph::drivers::{UartConfig, UartController};
use neon_periph::hal::{Bringup, Mmio, Topology};
use riscv_rt::entry;

#[entry]
fn main() -> ! {
    // Safety: 只访问 housekeeping、CSR 和用户工程窗口
    let bus = unsafe { Mmio::new() };
    let Ok(uart0) = Topology::new(UART_TOPOLOGY).and_then(|t| t.instance(0)) else { park() };
    let Some(plan) = uart_pin_plan(0) else { park() };

    let mut armed = Bringup::new(UserPads::new(&bus), UserInterface::new(&bus), MgmtGpio::new(&bus))
        .route_plan(&plan)
        .commit()
        .arm();

    let Ok(mut uart) = UartController::new(armed.bus(&bus), uart0).and_then(|u| u.configure(UartConfig::default()))
    else {
        park()
    };
    armed.signal_ready();
    uart.transact(b"Hello\n");

    park()
}
