use std::env;
use std::fs;
use std::path::Path;

// Place the workspace config.toml next to the compiled binary so the
// runtime lookup in shared::config finds it. Missing file is fine, the
// embedded default takes over.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let profile = match env::var("PROFILE") {
        Ok(p) => p,
        Err(_) => return,
    };

    // OUT_DIR is target/<profile>/build/backend-xxx/out
    let out_path = Path::new(&out_dir);
    let Some(target_dir) = out_path.ancestors().find(|p| p.ends_with(&profile)) else {
        return;
    };

    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent());
    let Some(workspace_root) = workspace_root else {
        return;
    };

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        if let Err(e) = fs::copy(&source_config, target_dir.join("config.toml")) {
            println!("cargo:warning=Failed to copy config.toml: {}", e);
        }
    }
}
