//! Response compression middleware.

use tower_http::compression::{
    CompressionLayer, Predicate,
    predicate::{NotForContentType, SizeAbove},
};

/// Creates a gzip compression layer for bodies of at least `min_size` bytes.
///
/// Compression only happens when the client sends `Accept-Encoding: gzip`.
/// gRPC, image (except SVG) and server-sent event responses are never
/// compressed. Bodies without a known size are compressed.
///
/// The layer removes `Content-Length` from compressed responses, so headers
/// added by outer middleware stay consistent with the encoded body.
pub fn layer(min_size: u16) -> CompressionLayer<impl Predicate> {
    let predicate = SizeAbove::new(min_size)
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE);

    CompressionLayer::new().compress_when(predicate)
}
