//! slotfile CLI
//!
//! Command-line interface for a slotfile store on disk.

use std::fmt::Write as _;
use std::process;

use clap::{Parser, Subcommand};
use slotfile::layout::{Field, Layout, LayoutByte};
use slotfile::{Config, ProductInput, Record, RecordStore};
use tracing_subscriber::{fmt, EnvFilter};

/// slotfile CLI
#[derive(Parser, Debug)]
#[command(name = "slotfile-cli")]
#[command(about = "Variable-length record store with best-fit slot reuse")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./slotfile_data")]
    data_dir: String,

    /// Artificial latency per write, in milliseconds
    #[arg(short, long, default_value = "0")]
    latency_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List active records
    List,

    /// Show one active record
    Get {
        /// Record id
        id: u64,
    },

    /// Create a record
    Create {
        name: String,

        /// 13-character GTIN
        gtin: String,

        #[arg(default_value = "")]
        description: String,
    },

    /// Replace the contents of a record
    Update {
        id: u64,

        name: String,

        /// 13-character GTIN
        gtin: String,

        #[arg(default_value = "")]
        description: String,
    },

    /// Logically delete a record
    Delete {
        /// Record id
        id: u64,
    },

    /// Print slot offsets and field ranges
    Layout,

    /// Hex dump of the byte image
    Dump {
        /// Bytes per line
        #[arg(short, long, default_value = "16")]
        width: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slotfile=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .write_latency_ms(args.latency_ms)
        .build();

    let store = match RecordStore::open(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&store, args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(store: &RecordStore, command: Commands) -> slotfile::Result<()> {
    match command {
        Commands::List => {
            for record in store.list_active()? {
                print_record(&record);
            }
        }
        Commands::Get { id } => print_record(&store.get(id)?),
        Commands::Create {
            name,
            gtin,
            description,
        } => {
            let input = ProductInput::new(&name, &gtin, &description);
            let record = store.create_validated(&input)?;
            println!("created");
            print_record(&record);
        }
        Commands::Update {
            id,
            name,
            gtin,
            description,
        } => {
            let input = ProductInput::new(&name, &gtin, &description);
            let record = store.update_validated(id, &input)?;
            println!("updated");
            print_record(&record);
        }
        Commands::Delete { id } => {
            store.delete(id)?;
            println!("deleted {}", id);
        }
        Commands::Layout => print_layout(&store.layout()?),
        Commands::Dump { width } => print!("{}", hex_dump(&store.layout()?.bytes(), width.max(1))),
    }

    Ok(())
}

fn print_record(record: &Record) {
    println!(
        "{:>6}  {}  {:<24} size={:<5} {}",
        record.id, record.gtin, record.name, record.size, record.description
    );
}

fn print_layout(layout: &Layout) {
    let header = layout.header();
    println!(
        "{:08X}  header  active={} last_id={}",
        0, header.active_count, header.last_id
    );

    for record in layout.records() {
        println!(
            "{:08X}  slot #{} capacity={} {} slack={}",
            record.offset,
            record.index,
            record.capacity,
            if record.active { "active" } else { "deleted" },
            record.slack()
        );
        for range in &record.fields {
            println!(
                "          {:08X}..{:08X}  {}",
                range.offset,
                range.end(),
                range.field.label()
            );
        }
    }

    println!("{:08X}  end", layout.total_len());
}

/// One line per `width` bytes: address, hex, printable ASCII. A gap in the
/// addresses (slot slack) starts a new line.
fn hex_dump(image: &[LayoutByte], width: usize) -> String {
    let mut out = String::new();
    let mut line: Vec<&LayoutByte> = Vec::with_capacity(width);

    for byte in image {
        let contiguous = line
            .last()
            .map(|prev| prev.address + 1 == byte.address)
            .unwrap_or(true);

        if line.len() == width || !contiguous {
            flush_line(&mut out, &line, width);
            line.clear();
        }
        line.push(byte);
    }
    flush_line(&mut out, &line, width);

    out
}

fn flush_line(out: &mut String, line: &[&LayoutByte], width: usize) {
    let Some(first) = line.first() else {
        return;
    };

    let _ = write!(out, "{:08X}  ", first.address);
    for byte in line {
        let marker = if byte.deleted && byte.field != Field::Tombstone {
            '~'
        } else {
            ' '
        };
        let _ = write!(out, "{:02X}{}", byte.value, marker);
    }
    for _ in line.len()..width {
        out.push_str("   ");
    }

    out.push(' ');
    for byte in line {
        let c = if (0x20..=0x7E).contains(&byte.value) {
            byte.value as char
        } else {
            '.'
        };
        out.push(c);
    }
    out.push('\n');
}
