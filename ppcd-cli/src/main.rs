mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ppcd_image::Image;
use ppcd_isa::{Collector, DiagnosticGroup, Endianness, LogSink};
use ppcd_powerpc::{Model, PowerPcArchitecture};
use serde::Serialize;

use config::{Config, Settings, parse_number};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ppcd", about = "PowerPC machine code disassembler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble a raw code image
    Disasm(ImageArgs),
    /// Disassemble and report every encoding that failed to decode, as YAML
    Coverage(ImageArgs),
    /// Show decoder table statistics for a model
    Info {
        #[arg(short, long, default_value = "ppc32")]
        model: Model,
    },
}

#[derive(Args)]
struct ImageArgs {
    /// Path to the raw image
    input: PathBuf,
    /// YAML file with model, endianness, base_address, offset and length
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// ppc32, ppc64 or xenon
    #[arg(short, long)]
    model: Option<Model>,
    /// big or little
    #[arg(short, long)]
    endian: Option<Endianness>,
    /// Address of the first byte of the file
    #[arg(short, long, value_parser = parse_number)]
    base: Option<u64>,
    /// File offset to start at
    #[arg(long, value_parser = parse_number)]
    offset: Option<u64>,
    /// Number of bytes to decode
    #[arg(short, long, value_parser = parse_number)]
    length: Option<u64>,
}

impl ImageArgs {
    fn settings(&self) -> Settings {
        let file = match &self.config {
            Some(path) => match Config::load(path) {
                Ok(c) => c,
                Err(e) => fail(e),
            },
            None => Config::default(),
        };
        let flags = Config {
            model: self.model,
            endianness: self.endian,
            base_address: self.base,
            offset: self.offset,
            length: self.length,
        };
        file.merge(flags).resolve()
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Disasm(args) => cmd_disasm(&args.input, &args.settings()),
        Commands::Coverage(args) => cmd_coverage(&args.input, &args.settings()),
        Commands::Info { model } => cmd_info(model),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

/// The part of the file selected by `settings`, placed at its address.
fn load(path: &Path, settings: &Settings) -> Image {
    let image = match Image::open(path, settings.base) {
        Ok(i) => i,
        Err(e) => fail(e),
    };
    let offset = match usize::try_from(settings.offset) {
        Ok(o) => o,
        Err(_) => fail(format!("offset {:#x} does not fit in memory", settings.offset)),
    };
    let len = match settings.length {
        Some(l) => usize::try_from(l).unwrap_or(usize::MAX),
        None => image.len().saturating_sub(offset),
    };
    match image.slice(offset, len) {
        Ok(i) => i,
        Err(e) => fail(e),
    }
}

fn cmd_disasm(path: &Path, settings: &Settings) {
    let image = load(path, settings);
    let arch = PowerPcArchitecture::new(settings.model)
        .with_diagnostics(Arc::new(LogSink))
        .with_endianness(settings.endianness);

    println!("# {} ({}, {})", path.display(), settings.model, settings.endianness);
    let words = image.bytes().chunks_exact(4);
    for (bytes, instr) in words.zip(arch.disassembler(image.reader(settings.endianness))) {
        println!(
            "{}  {:02X} {:02X} {:02X} {:02X}  {}",
            instr.address, bytes[0], bytes[1], bytes[2], bytes[3], instr
        );
    }
}

#[derive(Serialize)]
struct CoverageReport {
    model: Model,
    endianness: Endianness,
    words: usize,
    illegal: usize,
    diagnostics: Vec<DiagnosticGroup>,
}

fn cmd_coverage(path: &Path, settings: &Settings) {
    let image = load(path, settings);
    let collector = Arc::new(Collector::new());
    let arch = PowerPcArchitecture::new(settings.model)
        .with_diagnostics(collector.clone())
        .with_endianness(settings.endianness);

    let mut words = 0;
    let mut illegal = 0;
    for instr in arch.disassembler(image.reader(settings.endianness)) {
        words += 1;
        if !instr.is_valid() {
            illegal += 1;
        }
    }
    log::info!("{illegal} of {words} words did not decode");

    let report = CoverageReport {
        model: settings.model,
        endianness: settings.endianness,
        words,
        illegal,
        diagnostics: collector.summary(),
    };
    match serde_yaml::to_string(&report) {
        Ok(text) => print!("{text}"),
        Err(e) => fail(e),
    }
}

fn cmd_info(model: Model) {
    let arch = PowerPcArchitecture::new(model);
    let regs = arch.registers();
    let stats = arch.stats();

    println!("=== PowerPC Decoder Info ===");
    println!("Model:            {model}");
    println!("Word width:       {} bits", arch.word_width().bits());
    println!("VMX128:           {}", if model.has_vmx128() { "yes" } else { "no" });
    println!(
        "Registers:        {} GPR, {} FPR, {} VR, {} CR fields, {} named SPR",
        regs.general_count(),
        regs.floating_count(),
        regs.vector_count(),
        regs.condition_count(),
        regs.spr_count()
    );
    println!("Instructions:     {} ({} mnemonics)", stats.instructions, stats.mnemonics);
    println!("Not implemented:  {}", stats.not_implemented);
    println!("Unreachable:      {}", stats.shadowed);
    println!(
        "Illegal words:    {} ({:.2}%)",
        stats.invalid_words,
        stats.invalid_words as f64 * 100.0 / (1u64 << 32) as f64
    );
}
