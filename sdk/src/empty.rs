use serde::{Deserialize, Serialize};

/// `google.protobuf.Empty` as an RPC input or output.
///
/// `prost-build` maps `Empty` to `()`, which has no `prost::Name` and
/// serializes to JSON `null`. This one is `{}` in JSON and zero bytes in
/// protobuf, like every other Twirp implementation expects.
#[derive(Clone, Copy, PartialEq, Eq, prost::Message, Serialize, Deserialize)]
pub struct Empty {}

impl prost::Name for Empty {
    const NAME: &'static str = "Empty";
    const PACKAGE: &'static str = "google.protobuf";
}
