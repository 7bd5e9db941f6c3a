use vhsave::{profile::Pin, ErrorKind, PackageWriter, PlayerProfile, Vector3};

fn map_record() -> PackageWriter {
    let mut map = PackageWriter::new();
    map.write_i32(2).write_i32(2);
    for cell in [1u8, 1, 0, 0] {
        map.write_u8(cell);
    }
    map.write_i32(1);
    map.write_string("Base").unwrap();
    map.write_vector3(Vector3::new(4.0, 5.0, 6.0))
        .write_i32(1)
        .write_bool(true);
    map
}

fn profile_file() -> Vec<u8> {
    let mut record = PackageWriter::new();
    record.write_i32(30);
    record.write_i32(1).write_i32(0).write_i32(0).write_i32(0);

    record.write_i32(1).write_i64(0x0102_0304);
    record
        .write_bool(false)
        .write_vector3(Vector3::default())
        .write_bool(true)
        .write_vector3(Vector3::new(-5.0, 40.0, 5.0))
        .write_bool(true)
        .write_vector3(Vector3::new(1.0, 2.0, 3.0))
        .write_vector3(Vector3::default())
        .write_bool(true);
    record.write_package(&map_record()).unwrap();

    record.write_string("Bjorn").unwrap();
    record.write_i64(-8);
    record.write_string("").unwrap();
    record.write_bool(false);

    let mut file = PackageWriter::new();
    file.write_package(&record).unwrap();

    // the trailing package is never interpreted
    let mut trailer = PackageWriter::new();
    trailer.write_string("opaque").unwrap();
    file.write_package(&trailer).unwrap();
    file.into_inner()
}

#[test]
fn test_version_30_profile() {
    let profile = PlayerProfile::from_slice(&profile_file()).unwrap();
    assert_eq!(profile.version, 30);
    assert_eq!(profile.stats.kills, 1);
    assert_eq!(profile.name, "Bjorn");
    assert_eq!(profile.id, -8);

    let world = &profile.world_data[&0x0102_0304];
    assert!(!world.have_custom_spawn_point);
    assert!(world.have_logout_point);
    assert_eq!(world.logout_point, Vector3::new(-5.0, 40.0, 5.0));
    assert!(world.have_death_point);
    assert_eq!(world.death_point, Vector3::new(1.0, 2.0, 3.0));

    let map = world.map.as_ref().unwrap();
    assert_eq!(map.version, 2);
    assert_eq!(map.texture_size, 2);
    assert_eq!(map.explored, vec![true, true, false, false]);
    assert_eq!(
        map.pins,
        vec![Pin::new("Base", Vector3::new(4.0, 5.0, 6.0), 1, true)]
    );
    assert!(!map.public_reference_position);
}

#[test]
fn test_every_truncation_is_an_error() {
    let data = profile_file();
    for len in 0..data.len() {
        let result = PlayerProfile::from_slice(&data[..len]);
        let err = result.expect_err("truncated profile decoded");
        assert!(matches!(
            err.kind(),
            ErrorKind::Eof { .. } | ErrorKind::InvalidLength { .. }
        ));
    }
}

#[test]
fn test_profile_from_file() {
    let path = std::env::temp_dir().join(format!("vhsave-profile-{}.fch", std::process::id()));
    std::fs::write(&path, profile_file()).unwrap();
    let profile = PlayerProfile::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(profile, PlayerProfile::from_slice(&profile_file()).unwrap());
}
