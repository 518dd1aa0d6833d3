use items_sync::{IdPolicy, ItemFields, ItemStore};

fn main() -> Result<(), items_sync::Error> {
    let dir = std::env::temp_dir();
    let data = dir.join("items_sync_example_data.json");
    let output = dir.join("items_sync_example_output.json");
    let _ = std::fs::remove_file(&data);
    let _ = std::fs::remove_file(&output);

    let store = ItemStore::builder(&data, &output)
        .id_policy(IdPolicy::MaxPlusOne)
        .build()?;

    // create / get
    let lamp = store.create(ItemFields::new("Lamp", "Brass desk lamp", 39.5))?;
    let mug = store.create(ItemFields::new("Mug", "Stoneware, 300ml", 8.0))?;
    println!("created {lamp:?}");
    println!("get {} = {:?}", mug.id, store.get(mug.id)?);

    // update keeps the id
    let mug = store.update(mug.id, ItemFields::new("Mug", "Stoneware, 350ml", 9.0))?;
    println!("updated {mug:?}");

    // bad input is rejected, nothing is written
    if let Err(e) = store.create(ItemFields::new("", "no name", 0.0)) {
        println!("rejected: {e}");
    }

    // deleting the highest id frees it for the next create
    store.delete(mug.id)?;
    let cup = store.create(ItemFields::new("Cup", "Espresso cup", 6.0))?;
    println!("reused id {} for {:?}", cup.id, cup.name);

    println!("list = {:?}", store.list()?);
    println!(
        "mirror on disk:\n{}",
        std::fs::read_to_string(store.mirror_path())?
    );

    let _ = std::fs::remove_file(&data);
    let _ = std::fs::remove_file(&output);
    Ok(())
}
