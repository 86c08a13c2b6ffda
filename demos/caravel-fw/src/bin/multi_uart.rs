//! 八个 UART 各发一行

#![no_std]
#![no_main]

use caravel_fw::{park, MgmtGpio, UserInterface, UserPads};
use neon_periph::config::{uart_pin_plan, UART_TOPOLOGY};
use neon_periph::drivers::{UartConfig, UartFleet};
use neon_periph::hal::{Bringup, Mmio, Topology};
use neon_periph::mem;
use riscv_rt::entry;

const MESSAGES: [&[u8]; 8] = [
    b"Hello\n", b"World\n", b"Test2\n", b"Test3\n", b"Test4\n", b"Test5\n", b"Test6\n", b"Test7\n",
];

#[entry]
fn main() -> ! {
    mem::init_heap();
    // Safety: 只访问 housekeeping、CSR 和用户工程窗口
    let bus = unsafe { Mmio::new() };
    let Ok(topology) = Topology::new(UART_TOPOLOGY) else { park() };

    let mut routing = Bringup::new(UserPads::new(&bus), UserInterface::new(&bus), MgmtGpio::new(&bus));
    for instance in topology.instances() {
        if let Some(plan) = uart_pin_plan(instance.index()) {
            routing = routing.route_plan(&plan);
        }
    }
    let mut armed = routing.commit().arm();

    let Ok(mut uarts) = UartFleet::configure(armed.bus(&bus), &topology, UartConfig::default()) else {
        park()
    };
    armed.signal_ready();

    for (uart, msg) in uarts.iter_mut().zip(MESSAGES) {
        uart.transact(msg);
    }

    park()
}
