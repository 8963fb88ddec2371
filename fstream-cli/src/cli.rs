//! Command-line interface definitions and dispatch.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use fstream_adapters::DEFAULT_BUFFER_SIZE;
use fstream_platform::{oneshot, open_file, FileStream, OpenMode, StreamConfig};
use std::io::{self, Read, Write};

/// fstream - buffered random-access file streams from the command line.
#[derive(Parser, Debug)]
#[command(name = "fstream")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a file to stdout.
    Cat {
        /// File to read.
        file: String,

        /// Cache capacity in bytes.
        #[arg(short, long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Write stdin to a file, replacing its contents.
    Write {
        /// File to write.
        file: String,

        /// Append instead of replacing.
        #[arg(short, long)]
        append: bool,

        /// Cache capacity in bytes.
        #[arg(short, long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Show file metadata.
    Info {
        /// File to inspect.
        file: String,
    },

    /// Print the size of a file in bytes.
    Size {
        /// File to inspect.
        file: String,
    },

    /// Check if a file exists. Exits with status 1 if it does not.
    Exists {
        /// File to check.
        file: String,
    },

    /// Delete a file.
    Rm {
        /// File to delete.
        file: String,
    },

    /// Rename a file.
    Mv {
        /// Current name.
        from: String,
        /// New name.
        to: String,
    },

    /// Copy a file through two buffered streams.
    Copy {
        /// Source file.
        source: String,
        /// Destination file, replaced if it exists.
        dest: String,

        /// Cache capacity of each stream in bytes.
        #[arg(short, long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
    },
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cat { file, buffer_size } => {
            let stdout = io::stdout();
            cat(&file, config(buffer_size)?, &mut stdout.lock())?;
        }
        Commands::Write {
            file,
            append,
            buffer_size,
        } => {
            let mode = if append { OpenMode::Append } else { OpenMode::WriteNew };
            let written = write_from(&file, mode, config(buffer_size)?, io::stdin().lock())?;
            log::info!("wrote {} bytes to {}", written, file);
        }
        Commands::Info { file } => {
            let meta = oneshot::info(&file).with_context(|| format!("Failed to stat {}", file))?;
            println!("name:      {}", meta.name);
            println!("directory: {}", meta.directory);
            println!("type:      {}", meta.extension.as_deref().unwrap_or("-"));
            println!("size:      {}", meta.size);
            match meta.created {
                Some(t) => println!("created:   {}", t),
                None => println!("created:   -"),
            }
            match meta.modified {
                Some(t) => println!("modified:  {}", t),
                None => println!("modified:  -"),
            }
        }
        Commands::Size { file } => {
            let size =
                oneshot::file_size(&file).with_context(|| format!("Failed to size {}", file))?;
            println!("{}", size);
        }
        Commands::Exists { file } => {
            let exists = oneshot::exists(&file)
                .with_context(|| format!("Failed to check {}", file))?;
            println!("{}", exists);
            if !exists {
                std::process::exit(1);
            }
        }
        Commands::Rm { file } => {
            oneshot::delete(&file).with_context(|| format!("Failed to delete {}", file))?;
        }
        Commands::Mv { from, to } => {
            oneshot::rename(&from, &to)
                .with_context(|| format!("Failed to rename {} to {}", from, to))?;
        }
        Commands::Copy {
            source,
            dest,
            buffer_size,
        } => {
            let copied = copy(&source, &dest, config(buffer_size)?)?;
            log::info!("copied {} bytes from {} to {}", copied, source, dest);
        }
    }
    Ok(())
}

fn config(buffer_size: usize) -> Result<StreamConfig> {
    match StreamConfig::new(buffer_size) {
        Ok(config) => Ok(config),
        Err(e) => bail!("Invalid --buffer-size {}: {}", buffer_size, e),
    }
}

fn open(name: &str, mode: OpenMode, config: StreamConfig) -> Result<FileStream> {
    open_file(name, mode, config).with_context(|| format!("Failed to open {} ({})", name, mode))
}

/// Stream `name` into `out`, one cache-sized block at a time.
fn cat(name: &str, config: StreamConfig, out: &mut impl Write) -> Result<u64> {
    let mut stream = open(name, OpenMode::ReadOnly, config)?;
    let mut buf = vec![0u8; config.capacity().get()];
    let mut total = 0u64;

    loop {
        let n = stream.read_block(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.flush()?;
    stream.close()?;
    Ok(total)
}

/// Copy everything `input` yields into `name`.
fn write_from(name: &str, mode: OpenMode, config: StreamConfig, mut input: impl Read) -> Result<u64> {
    let mut stream = open(name, mode, config)?;
    let mut buf = vec![0u8; config.capacity().get()];
    let mut total = 0u64;

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        stream.write_block(&buf[..n])?;
        total += n as u64;
    }
    stream.close().with_context(|| format!("Failed to close {}", name))?;
    Ok(total)
}

fn copy(source: &str, dest: &str, config: StreamConfig) -> Result<u64> {
    let mut input = open(source, OpenMode::ReadOnly, config)?;
    let mut output = open(dest, OpenMode::WriteNew, config)?;
    let mut buf = vec![0u8; config.capacity().get()];
    let mut total = 0u64;

    loop {
        let n = input.read_block(&mut buf)?;
        if n == 0 {
            break;
        }
        output.write_block(&buf[..n])?;
        total += n as u64;
    }
    output
        .close()
        .with_context(|| format!("Failed to close {}", dest))?;
    Ok(total)
}
