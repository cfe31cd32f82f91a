use git_version::git_version;

pub fn transferdeck_version() -> &'static str {
    git_version!(
        args = ["--tags", "--always", "--dirty=-modified"],
        fallback = env!("CARGO_PKG_VERSION")
    )
}
