use anyhow::Result;
use tracing::Level;

use handle_audit::config::{load_config, validate_config};

fn main() -> Result<()> {
    let config = load_config();
    validate_config(&config)?;

    let level = config
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let cli = Cli::parse(std::env::args().skip(1))?;

    #[cfg(not(windows))]
    {
        let _ = cli;
        anyhow::bail!("handle-audit only supports Windows targets");
    }

    #[cfg(windows)]
    run(&config, &cli)
}

/// Command line: `handle-audit <pid> [type-filter] [--all] [--json]`
#[derive(Debug)]
struct Cli {
    pid: u32,
    type_filter: String,
    show_all: bool,
    json: bool,
}

impl Cli {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut pid = None;
        let mut type_filter: Option<String> = None;
        let mut show_all = false;
        let mut json = false;

        for arg in args {
            match arg.as_str() {
                "--all" => show_all = true,
                "--json" => json = true,
                other if other.starts_with("--") => {
                    anyhow::bail!("unknown option '{}'", other)
                }
                other if pid.is_none() => {
                    pid = Some(other.parse::<u32>().map_err(|_| {
                        anyhow::anyhow!("expected a numeric PID, got '{}'", other)
                    })?);
                }
                other if type_filter.is_none() => type_filter = Some(other.to_string()),
                other => anyhow::bail!("unexpected extra argument '{}'", other),
            }
        }

        let pid = pid.ok_or_else(|| {
            anyhow::anyhow!("usage: handle-audit <pid> [type-filter] [--all] [--json]")
        })?;
        Ok(Cli {
            pid,
            type_filter: type_filter.unwrap_or_default(),
            show_all,
            json,
        })
    }
}

#[cfg(windows)]
fn run(config: &handle_audit::config::Config, cli: &Cli) -> Result<()> {
    use handle_audit::output::{build_report, filter_entries, render_table};
    use handle_audit::privileges::{impersonate_via_donor, PrivilegeEnabler};
    use handle_audit::process::process_name_by_pid;
    use handle_audit::resolver::compose::friendly_process_name;
    use handle_audit::windows::{handles_for_process, object_type_table, NativeInspector};
    use handle_audit::ObjectNameResolver;
    use tracing::{info, warn};

    let (all_enabled, report) =
        PrivilegeEnabler::enable_for_current_process(&config.scan.privileges);
    for (name, enabled) in report.iter() {
        info!(privilege = name, enabled, "process privilege");
    }
    if !all_enabled {
        warn!("not all requested privileges could be enabled");
    }

    // Held for the duration of the scan; reverts on drop.
    let guard = if config.scan.impersonate {
        match impersonate_via_donor(&config.scan.donor_process, &config.scan.privileges) {
            Ok(guard) => {
                info!(level = %guard.level(), "impersonation active");
                Some(guard)
            }
            Err(err) => {
                warn!(error = %err, "impersonation unavailable, scanning as self");
                None
            }
        }
    } else {
        None
    };

    let types = object_type_table()?;
    let entries = handles_for_process(cli.pid)?;
    let filtered = filter_entries(&entries, &types, &cli.type_filter);

    let inspector = NativeInspector::new();
    let resolver = ObjectNameResolver::new(&inspector);
    let names = resolver.resolve(cli.pid, &filtered);

    // display without the .exe suffix, matching the thread-owner rule
    let target_name = process_name_by_pid(cli.pid)
        .map(|name| friendly_process_name(&name).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let show_all = cli.show_all || config.output.show_unnamed;

    if cli.json || config.output.format == "json" {
        let report = build_report(cli.pid, &target_name, &filtered, &names, show_all);
        println!("{}", report.to_json()?);
    } else {
        print!(
            "{}",
            render_table(cli.pid, &target_name, &filtered, &names, show_all)
        );
    }

    drop(guard);
    Ok(())
}
