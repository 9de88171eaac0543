use touchbridge::{DriverConfig, TouchDriver};

fn main() {
    let driver = TouchDriver::new(DriverConfig::default());
    let info = driver.info();
    println!(
        "{} {}.{} ({})",
        info.name, info.version_major, info.version_minor, info.vendor
    );

    let list = driver.enumerate();
    for descriptor in list.iter() {
        let json = serde_json::to_string_pretty(&descriptor.meta).expect("serialize metadata");
        println!("{json}");
    }

    if list.is_empty() {
        eprintln!("no usable touch devices found");
    }
}
