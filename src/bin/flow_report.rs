use std::io;

use algo_report::config::ReportPaths;
use algo_report::report::flow;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    flow::run(&ReportPaths::default(), &mut io::stdout().lock())?;
    Ok(())
}
