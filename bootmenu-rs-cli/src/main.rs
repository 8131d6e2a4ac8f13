// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! A command line interface frontend to `bootmenu-rs`.
//!
//! Compiles the boot menu configuration next to the running image and prints what came out of it, or saves
//! the label that the next boot should default to.

#![no_main]
#![no_std]

extern crate alloc;

use alloc::{string::ToString, vec::Vec};

use bootmenu_rs_core::{
    MenuResult,
    config::{MenuConfig, builder::MenuCompiler},
    menu::MenuAction,
    system::{
        console::UefiConsole, fs::UefiFileSystem, log_backend::UefiLogger,
        variable::UefiVariableStore,
    },
};
use getargs::{Arg, Options};
use log::LevelFilter;
use uefi::{Status, boot, cstr16, entry, println, proto::loaded_image::LoadedImage};

/// What the command line asked for.
enum Command {
    /// Compile and print the menu tree.
    List,

    /// Compile and print the labels that start with a prefix.
    Complete,

    /// Save a label as the next default.
    Save,

    /// Print the usage.
    Help,
}

/// The actual main function of the program.
///
/// # Errors
///
/// May return an `Error` if the program could not obtain the `LoadedImage` protocol, the filesystem of the
/// image, or the saved default variable could not be written.
fn main_func() -> MenuResult<()> {
    uefi::helpers::init()?; // initialize helpers (for print)

    let load_options = {
        let handle = boot::image_handle();
        let loaded_image = boot::open_protocol_exclusive::<LoadedImage>(handle)?;
        loaded_image
            .load_options_as_cstr16()
            .unwrap_or(cstr16!("bootmenu-rs-cli.efi")) // there is at least one argument, which is the filename
            .to_string()
    }; // loaded_image dropped here

    let mut options = load_options.split_whitespace();

    let Some(app_filename) = options.next() else {
        println!("Error: No load options were passed to the program");
        return Ok(());
    };

    let mut command = Command::Help;
    let mut files = Vec::new();
    let mut label = None;
    let mut prefix = "";
    let mut level = LevelFilter::Warn;

    let mut opts = Options::new(options);
    while let Ok(Some(arg)) = opts.next_arg() {
        match arg {
            Arg::Short('l') | Arg::Long("list") => command = Command::List,
            Arg::Short('c') | Arg::Long("config") => {
                let Ok(value) = opts.value() else {
                    println!("Error: A file was not passed into the config argument");
                    return Ok(());
                };
                files.push(value);
            }
            Arg::Short('p') | Arg::Long("prefix") => {
                let Ok(value) = opts.value() else {
                    println!("Error: A prefix was not passed into the prefix argument");
                    return Ok(());
                };
                prefix = value;
                command = Command::Complete;
            }
            Arg::Short('s') | Arg::Long("save") => {
                let Ok(value) = opts.value() else {
                    println!("Error: A label was not passed into the save argument");
                    return Ok(());
                };
                label = Some(value);
                command = Command::Save;
            }
            Arg::Short('v') | Arg::Long("verbose") => level = LevelFilter::Debug,
            Arg::Short('h') | Arg::Long("help") => {
                command = Command::Help;
                break; // ignore any other arguments when help is specified
            }
            Arg::Short(invalid) => println!("Error: Unknown short argument: -{invalid}"),
            Arg::Long(invalid) => println!("Error: Unknown long argument: --{invalid}"),
            Arg::Positional(invalid) => println!("Error: Unknown positional argument: {invalid}"),
        }
    }

    let _ = log::set_logger(UefiLogger::static_new(level)).map(|()| log::set_max_level(level));

    match command {
        Command::List => print_config(&compile(&files)?),
        Command::Complete => {
            for label in compile(&files)?.labels_with_prefix(prefix) {
                println!("{label}");
            }
        }
        Command::Save => {
            let label = label.unwrap_or_default();
            UefiVariableStore::new().store_label(label)?;
            println!("Saved {label} as the next default");
        }
        Command::Help => println!(
            r"Usage: {app_filename} [OPTIONS]

-h, --help             display this help and exit
-l, --list             compile the configuration and display its menus
-c, --config FILE      compile FILE instead of the conventional names (may repeat)
-p, --prefix TEXT      compile the configuration and display the labels starting with TEXT
-s, --save LABEL       make LABEL the default of the next boot (empty clears it)
-v, --verbose          log what was skipped while compiling
"
        ),
    }

    Ok(())
}

/// Compiles `files` from the filesystem of the running image, or the conventional names if there are none.
///
/// # Errors
///
/// May return an `Error` if the filesystem of the image could not be opened.
fn compile(files: &[&str]) -> MenuResult<MenuConfig> {
    let mut fs = UefiFileSystem::from_image_fs()?;
    let mut console = UefiConsole;
    let mut saved = UefiVariableStore::new();
    Ok(MenuCompiler::new(&mut fs)
        .console(&mut console)
        .saved_default(&mut saved)
        .compile(files))
}

/// Prints every menu of `config` with its entries. The default entry of each menu is starred.
fn print_config(config: &MenuConfig) {
    let tree = &config.tree;
    for (id, menu) in tree.menus() {
        if id == tree.hidden() && menu.entries.is_empty() {
            continue;
        }

        let label = menu.label.as_deref().unwrap_or("(unlabelled)");
        let start = if id == config.start_menu { " [start]" } else { "" };
        println!("{label}: {}{start}", menu.title);

        for entry in tree.menu_entries(id) {
            let marker = if entry.index == menu.default_entry { '*' } else { ' ' };
            let name = entry
                .display_name
                .as_deref()
                .or(entry.label.as_deref())
                .unwrap_or_default();

            match &entry.action {
                MenuAction::Cmd => {
                    let cmdline = entry.cmdline.as_deref().unwrap_or_default();
                    println!("  {marker} {}: {name} => {cmdline}", entry.index);
                }
                MenuAction::Goto(target) | MenuAction::Exit(target) | MenuAction::Submenu(target) => {
                    let target = tree.menu(*target).label.as_deref().unwrap_or_default();
                    println!("  {marker} {}: {name} -> {target}", entry.index);
                }
                MenuAction::Quit => println!("  {marker} {}: {name} (quit)", entry.index),
                MenuAction::Disabled => println!("    {}: {name}", entry.index),
                MenuAction::GotoUnresolved(_) | MenuAction::ExitUnresolved(_) => {
                    println!("  ? {}: {name}", entry.index);
                }
            }
        }
    }

    if let Some(target) = &config.global_default {
        let found = if config.default_menu.is_some() { "" } else { " (not found)" };
        println!("default: {target}{found}");
    }
    if let Some(cmd) = &config.default_cmd {
        println!("default command: {cmd}");
    }
    if !config.total_timeout.is_zero() {
        println!("total timeout: {}ms", config.total_timeout.as_millis());
    }
}

/// The main function of the program.
///
/// This will not panic on a fatal error, rather, it will return control to the UEFI shell (or the firmware menu).
/// This program is intended to be ran as a shell script, so panicking here would not make any sense.
#[entry]
fn main() -> Status {
    if let Err(e) = main_func() {
        println!("Error: {e}");
    }
    Status::SUCCESS
}
