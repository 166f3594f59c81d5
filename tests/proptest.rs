//! Property-based tests for snmpv1-manager.
//!
//! The binding-order test runs against one shared TestAgent so cases do not
//! exhaust sockets.

mod common;

use bytes::Bytes;
use common::TestAgent;
use proptest::prelude::*;
use snmpv1_manager::{BerCodec, Codec, Manager, Oid, oid};
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

fn peer() -> SocketAddr {
    "127.0.0.1:161".parse().unwrap()
}

struct SharedEnv {
    runtime: Runtime,
    agent: TestAgent,
    manager: Manager,
}

fn env() -> &'static SharedEnv {
    static ENV: OnceLock<SharedEnv> = OnceLock::new();
    ENV.get_or_init(|| {
        let runtime = Runtime::new().expect("failed to create runtime");
        let agent = runtime.block_on(TestAgent::new());
        SharedEnv {
            runtime,
            agent,
            manager: common::manager(),
        }
    })
}

/// Any non-empty list of system group scalars, duplicates allowed.
fn arb_system_oids() -> impl Strategy<Value = Vec<Oid>> {
    prop::collection::vec(1u32..=7, 1..=7).prop_map(|arcs| {
        arcs.into_iter()
            .map(|arc| oid!(1, 3, 6, 1, 2, 1, 1).child(arc).child(0))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A successful GET returns one binding per request binding, in order.
    #[test]
    fn get_preserves_binding_order(oids in arb_system_oids()) {
        let env = env();
        let outcome = env
            .runtime
            .block_on(env.manager.get(&env.agent.endpoint(), oids.clone()))
            .unwrap();

        let varbinds = outcome.varbinds().expect("system group GET succeeds");
        let returned: Vec<Oid> = varbinds.iter().map(|vb| vb.oid.clone()).collect();
        prop_assert_eq!(returned, oids);
    }

    /// Arbitrary datagrams never panic the decoder.
    #[test]
    fn decode_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..=512)) {
        let _ = BerCodec.decode(Bytes::from(data), peer());
    }

    /// Truncating a valid response always yields an error, never a panic.
    #[test]
    fn truncated_response_is_rejected(cut in 0usize..40) {
        let full = snmpv1_manager::message::CommunityMessage::new(
            Bytes::from_static(b"public"),
            snmpv1_manager::Pdu::response(
                7,
                snmpv1_manager::ErrorStatus::NoError,
                0,
                vec![snmpv1_manager::VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "agent")],
            ),
        )
        .encode();
        let cut = cut.min(full.len() - 1);
        prop_assert!(BerCodec.decode(full.slice(..cut), peer()).is_err());
    }
}
