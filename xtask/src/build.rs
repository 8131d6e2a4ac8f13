use duct::cmd;

pub fn build_cli(release: bool, target: &str) -> anyhow::Result<()> {
    let mut build_args = vec![
        "build",
        "-p",
        "bootmenu-rs-cli",
        "--target",
        target,
        "--features",
        "global_allocator,panic_handler",
    ];

    if release {
        build_args.extend(["--profile", "release-lto"]);
    }

    cmd("cargo", build_args).run()?;
    Ok(())
}
