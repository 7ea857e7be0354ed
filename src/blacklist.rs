//! Packages that are never attempted.
//!
//! The blacklist is assembled once at startup from the built-in defaults, the
//! on-disk list and whatever the operator types at the prompt. After that it
//! is only ever read.

use crate::error::{SweepError, SweepResult};
use colored::Colorize;
use log::{debug, info};
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;

/// Termux packages known to fail or to drag the device into a broken state
/// when installed unattended.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "frida-python", "zeronet", "bat", "make-guile", "libblosc", "libjpeg-turbo-static",
    "libminizip-ng", "libspnav", "openvdb", "ptex", "ptex-static", "libyaml-cpp",
    "opencolorio", "opencv", "openimageio", "openjpeg-tools", "pybind11",
    "pystring", "pyunbound", "sse2neon", "bison-static", "pysha3", "dropbear",
    "brotli-static", "assimp-glibc-static", "assimp-static", "binutils-gold",
    "clang-16", "cryptsetup-static", "exiv2-static", "emacs", "gap-static",
    "gcc10", "gcc9", "gcc-default-9", "gcc-default-10", "gcc-default-11",
    "gcc-default-12", "gcc-default-13", "gcc-default-14", "gdal-static",
    "ghc-libs-static", "global-static", "gspell-static",
    "gst-plugins-gl-headers", "guile-static", "guile18", "hash-slinger",
    "kakoune-lsp", "python-pyarrow", "lite-xl-static", "lighttpd-static",
    "libzthread-static", "libxxf86vm-static", "libxv-static", "libxslt-static",
    "libxshmfence-static", "libxrender-static", "libxau-static",
    "libwebrtc-audio-processing-static", "libvips-static", "libpixman-static",
    "libsm-static", "libusbredir-static", "libsixel-static", "libopus-glibc-static",
    "libobjc2", "libnfs-static", "libmad-static", "libmaa-static",
    "libllvm-classic-flang", "binutils-is-llvm", "libllvm-16-static",
    "libheif-static", "libfm", "libhiredis-static", "libice-static",
    "libflann-static", "libexecinfo-static", "lfortran-llvm",
    "mpv-x", "mpd-static", "mp3cat-go", "mp3cat",
    "mesa-zink-dev", "mesa-zink", "mesa-vulkan-icd-freedreno-dri3",
    "nodejs", "nodejs-lts", "nexttrace", "ndk-sysroot-gcc-compact",
    "ncspot-mpris", "ncspot", "osmesa", "opencolorio-static",
    "openblas", "octave", "obconf", "python-scipy-2", "python-is-python3.9",
    "python-is-python3.8", "python-is-python3.7", "python-is-python3.11",
    "python-is-python3.10", "pulseaudio-static", "pulseaudio-glib-static",
    "protobuf-static", "pinentry-gtk", "parole-static", "php", "php-fpm",
    "php-pgsql", "php7.2", "qemu-system-x86-64-static",
    "qemu-system-x86-64-headless-static", "qemu-system-x86-64-headless",
    "qemu-system-riscv64-headless", "qemu-system-ppc64-headless",
    "qemu-system-ppc-headless", "qemu-system-m68k-headless",
    "qemu-system-i386-headless", "qemu-system-arm-headless",
    "qemu-system-aarch64-headless", "rust-nightly-wasm32-unknown-unknown", "ruby", "rip",
    "rife-ncnn-vulkan-is-nihui", "recoll-static", "rc",
    "radare2-static", "spirv-llvm-translator-glibc-static",
    "spglib-static", "spirv-tools", "sdl2-compat",
    "glslang", "libncnn", "tree-sitter-c-static",
    "transmission", "tmux-sixel", "tinymist",
    "unbound-static", "vulkan-loader-generic",
    "virglrenderer-mesa-zink", "vlc-qt",
    "vim-gtk", "wireless-tools-static",
    "wasmedge-static", "xsv-ucw",
    "xfce4-wavelan-plugin-static", "xfce4-timer-plugin-static",
    "xfce4-places-plugin-static", "xfce4-notes-plugin-static",
    "xfce4-netload-plugin-static", "xfce4-mailwatch-plugin-static",
    "xfce4-genmon-plugin-static", "xfce4-eyes-plugin-static",
    "xfce4-calculator-plugin-static", "zstd-static",
];

/// Immutable exclusion set for one run.
#[derive(Debug, Clone)]
pub struct Blacklist {
    lookup: HashSet<String>,
}

impl Blacklist {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lookup: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::from_entries(DEFAULT_BLACKLIST.iter().copied())
    }

    /// Defaults, then the file at `path`, then `additions`. When there are
    /// additions the merged list is written back to `path`.
    pub fn assemble(path: &Path, additions: Vec<String>) -> SweepResult<Self> {
        let mut entries: Vec<String> = DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect();
        let from_file = load_blacklist_file(path)?;
        debug!(
            "Loaded {} blacklist entries from {}",
            from_file.len(),
            path.display()
        );
        entries.extend(from_file);

        if !additions.is_empty() {
            info!("Adding {} package(s) to the blacklist", additions.len());
            entries.extend(additions);
            save_blacklist_file(path, &entries)?;
        }

        Ok(Self::from_entries(entries))
    }

    /// Exact string match.
    pub fn contains(&self, package: &str) -> bool {
        self.lookup.contains(package)
    }

    /// Number of distinct names.
    pub fn distinct_count(&self) -> usize {
        self.lookup.len()
    }
}

/// One name per line. A missing file reads as empty.
pub fn load_blacklist_file(path: &Path) -> SweepResult<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        SweepError::BlacklistError(format!("cannot read {}: {}", path.display(), e))
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Overwrites `path` with `entries`, one per line, keeping the first
/// occurrence of each name.
pub fn save_blacklist_file(path: &Path, entries: &[String]) -> SweepResult<()> {
    let mut seen = HashSet::new();
    let mut content = String::new();
    for entry in entries {
        if seen.insert(entry.as_str()) {
            content.push_str(entry);
            content.push('\n');
        }
    }
    std::fs::write(path, content).map_err(|e| {
        SweepError::BlacklistError(format!("cannot write {}: {}", path.display(), e))
    })
}

/// Splits a comma-separated line into trimmed, non-empty names.
pub fn parse_additions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Asks for extra names on the console and reads a single line from `input`.
/// End of input counts as an empty answer.
pub fn prompt_for_additions<R: BufRead>(input: &mut R) -> SweepResult<Vec<String>> {
    println!(
        "{}",
        "Enter packages to add to the blacklist (comma-separated):".blue()
    );
    std::io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_additions(&line))
}
