fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile all proto files
    // - location.proto: regions and sites
    // - compute.proto: instances and the host/os references they carry
    // - telemetry.proto: telemetry groups and profiles
    // - inventory.proto: InventoryService (imports all of the above)
    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &[
                "proto/location.proto",
                "proto/compute.proto",
                "proto/telemetry.proto",
                "proto/inventory.proto",
            ],
            &["proto/"],
        )?;

    // Rebuild if any proto file changes
    println!("cargo:rerun-if-changed=proto/location.proto");
    println!("cargo:rerun-if-changed=proto/compute.proto");
    println!("cargo:rerun-if-changed=proto/telemetry.proto");
    println!("cargo:rerun-if-changed=proto/inventory.proto");

    Ok(())
}
