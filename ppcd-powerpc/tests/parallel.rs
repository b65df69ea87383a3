mod common;

use std::thread;

use common::*;
use ppcd_isa::{Address, Endianness, ImageReader};
use ppcd_powerpc::*;

/// A spread of words touching every primary opcode.
fn sample_words() -> Vec<u32> {
    (0u32..4096).map(|i| i.wrapping_mul(0x9E37_79B9) ^ (i << 26)).collect()
}

#[test]
fn shared_architecture_decodes_in_parallel() {
    let (arch, collector) = collecting(Model::Xenon);
    let words = sample_words();
    let sequential: Vec<_> = words
        .iter()
        .enumerate()
        .map(|(n, &w)| arch.decode(w, BASE.offset(4 * n as i64)))
        .collect();
    let reported = collector.take().len();

    let chunks: Vec<Vec<PowerPcInstruction>> = thread::scope(|s| {
        let handles: Vec<_> = words
            .chunks(1024)
            .enumerate()
            .map(|(c, chunk)| {
                let arch = &arch;
                s.spawn(move || {
                    chunk
                        .iter()
                        .enumerate()
                        .map(|(n, &w)| arch.decode(w, BASE.offset(4 * (c * 1024 + n) as i64)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("decoder thread panicked"))
            .collect()
    });
    let parallel: Vec<_> = chunks.into_iter().flatten().collect();

    assert_eq!(parallel, sequential);
    assert_eq!(collector.len(), reported);
}

#[test]
fn disassemblers_on_cloned_architectures() {
    let arch = PowerPcArchitecture::new(Model::Ppc64);
    let code = big_endian(&sample_words());
    let expected: Vec<_> = arch
        .disassembler(ImageReader::new(&code, Address(0), Endianness::Big))
        .collect();

    thread::scope(|s| {
        for _ in 0..4 {
            let arch = arch.clone();
            let code = &code;
            let expected = &expected;
            s.spawn(move || {
                let reader = ImageReader::new(code, Address(0), Endianness::Big);
                let got: Vec<_> = arch.disassembler(reader).collect();
                assert_eq!(&got, expected);
            });
        }
    });
}
