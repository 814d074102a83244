use crate::error::Result;
use crate::settings::{save_settings, shellexpand_path, Settings};
use crate::store::Store;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let dir = match data_dir {
        Some(path) => shellexpand_path(&path),
        None => Settings::default().data_dir,
    };

    save_settings(&Settings {
        data_dir: dir.clone(),
    })?;

    let store = Store::new(&dir);
    store.init()?;

    println!("Initialized hucha data directory at {dir}");
    println!("Seeded default categories. Import something with `hucha import`.");
    Ok(())
}
