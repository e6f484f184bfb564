fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The message types are hand-written prost structs in `src/pb.rs`, so only
    // the service plumbing is generated here and no protoc is needed.
    let process = tonic_build::manual::Method::builder()
        .name("process")
        .route_name("Process")
        .input_type("crate::pb::ProcessingRequest")
        .output_type("crate::pb::ProcessingResponse")
        .codec_path("tonic::codec::ProstCodec")
        .client_streaming()
        .server_streaming()
        .build();

    let external_processor = tonic_build::manual::Service::builder()
        .name("ExternalProcessor")
        .package("envoy.service.ext_proc.v3")
        .method(process)
        .build();

    tonic_build::manual::Builder::new()
        .build_server(true)
        .build_client(true)
        .compile(&[external_processor]);
    Ok(())
}
