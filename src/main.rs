use std::io;

use heic_to_jpg::action::cli::process_args;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let summary = process_args(args)?;
    log::info!("程式執行完成：{}", summary);
    println!("{}", summary);
    Ok(())
}
