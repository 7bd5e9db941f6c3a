#![no_main]
use libfuzzer_sys::fuzz_target;
use vhsave::World;

fuzz_target!(|data: &[u8]| {
    // Use the first byte to split the input between the two files
    let Some((&split, rest)) = data.split_first() else {
        return;
    };

    let split = usize::from(split).min(rest.len());
    let (meta, world) = rest.split_at(split);
    let meta = (!meta.is_empty()).then_some(meta);
    let world = (!world.is_empty()).then_some(world);

    let Ok(world) = World::from_slices(meta, world) else {
        return;
    };

    #[cfg(feature = "json")]
    let _ = serde_json::to_vec(&world).unwrap();

    #[cfg(not(feature = "json"))]
    let _ = world;
});
