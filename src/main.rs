use colored::Colorize;

use bv_entropy::{cost0, cost1, BinaryContext, BvResult, RangeDecoder, RangeEncoder, VERSION};

fn main() -> BvResult<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "probe" => {
            if args.len() < 3 {
                eprintln!("{} Input file required", "Error:".red().bold());
                std::process::exit(1);
            }
            probe(&args[2])?;
        }
        "version" => {
            println!("bvprobe {}", VERSION);
        }
        other => {
            eprintln!("{} Unknown command: {}", "Error:".red().bold(), other);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_usage() {
    println!("{}", "BV entropy probe".bold());
    println!();
    println!("Usage:");
    println!("  bvprobe probe <file>     Code a file through the range coder and report");
    println!("  bvprobe version          Print version");
}

// Order-0 bitwise model: one adaptive context per bit position of a byte,
// adapted every 4 KiB window.
const ADAPT_WINDOW: usize = 4096;

fn probe(path: &str) -> BvResult<()> {
    let input = std::fs::read(path)?;

    println!("File: {}", path);
    println!("Size: {} bytes", input.len());

    let start = std::time::Instant::now();
    let mut contexts: Vec<BinaryContext> = (0..8).map(|_| BinaryContext::default()).collect();
    let mut estimated_cost: u64 = 0;
    let mut enc = RangeEncoder::new(Vec::new());

    for (i, &byte) in input.iter().enumerate() {
        for pos in 0..8 {
            let bit = (byte >> (7 - pos)) & 1 != 0;
            let ctx = &mut contexts[pos];
            estimated_cost += if bit {
                cost1(ctx.prob())
            } else {
                cost0(ctx.prob())
            } as u64;
            enc.write(bit, ctx.prob());
            ctx.record(bit);
        }
        if (i + 1) % ADAPT_WINDOW == 0 {
            for ctx in &mut contexts {
                ctx.adapt();
            }
        }
    }
    let coded = enc.finish();
    let encode_time = start.elapsed();

    let start = std::time::Instant::now();
    let mut contexts: Vec<BinaryContext> = (0..8).map(|_| BinaryContext::default()).collect();
    let mut dec = RangeDecoder::from_slice(&coded);
    let mut mismatch = None;
    for (i, &byte) in input.iter().enumerate() {
        let mut decoded = 0u8;
        for pos in 0..8 {
            let ctx = &mut contexts[pos];
            let bit = dec.read(ctx.prob());
            decoded = (decoded << 1) | bit as u8;
            ctx.record(bit);
        }
        if decoded != byte && mismatch.is_none() {
            mismatch = Some(i);
        }
        if (i + 1) % ADAPT_WINDOW == 0 {
            for ctx in &mut contexts {
                ctx.adapt();
            }
        }
    }
    let decode_time = start.elapsed();

    let ratio = if input.is_empty() {
        0.0
    } else {
        coded.len() as f64 / input.len() as f64 * 100.0
    };
    let estimated_bytes = (estimated_cost / 512).div_ceil(8);

    println!();
    println!("Coded: {} bytes ({:.1}%)", coded.len(), ratio);
    println!("Model estimate: {} bytes", estimated_bytes);
    println!(
        "Encode: {:.2}ms  Decode: {:.2}ms",
        encode_time.as_secs_f64() * 1000.0,
        decode_time.as_secs_f64() * 1000.0
    );
    println!();

    match mismatch {
        None => println!("{}", "✓ Round-trip verified".green().bold()),
        Some(i) => {
            eprintln!("{} Round-trip mismatch at byte {}", "Error:".red().bold(), i);
            std::process::exit(1);
        }
    }

    Ok(())
}
