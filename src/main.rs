#![no_std]
#![no_main]

use embassy_executor::Spawner;
use esp_backtrace as _;

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    touchlink::firmware::run(spawner).await
}
