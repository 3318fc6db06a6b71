//! Build script for compiling Slint UI files.

#![allow(clippy::expect_used)]

fn main() {
    slint_build::compile("src/ui/login_window.slint").expect("Slint compilation failed");
}
