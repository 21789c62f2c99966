mod cli;
mod logging;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init_logging(command_line_interface.log_format, command_line_interface.log_level);
    match command_line_interface.run() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(2);
        }
    }
}
