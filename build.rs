// SPDX-License-Identifier: Apache-2.0
//! Build script: compile the mock GMH vendor library for integration tests.

use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mock_src = "tests/mock_gmh/mock_gmh.c";

    // Only build the mock library if the source exists (it's part of this crate).
    if !std::path::Path::new(mock_src).exists() {
        return;
    }

    let lib_name = if cfg!(target_os = "macos") {
        "libmock_gmh.dylib"
    } else {
        "libmock_gmh.so"
    };
    let so_path = out_dir.join(lib_name);

    let status = Command::new("cc")
        .args([
            "-shared",
            "-fPIC",
            "-o",
            so_path.to_str().unwrap(),
            mock_src,
            "-Wall",
            "-Wextra",
            "-O2",
        ])
        .status()
        .expect("failed to invoke C compiler");

    assert!(status.success(), "failed to compile mock GMH library: {status}");

    // Tell cargo where to find the compiled mock library.
    println!("cargo:rustc-env=MOCK_GMH_LIBRARY_PATH={}", so_path.display());

    // Re-run if the mock library source changes.
    println!("cargo:rerun-if-changed={mock_src}");
}
