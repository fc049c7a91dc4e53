//! Typed bindings evaluated against the mock backend

use std::sync::Arc;

use callbind_abi::{abi_struct, CodecConfig, DecodeError};
use callbind_contract::{
    contract_bindings, BackendError, BindError, BindingContext, CallError, MockBackend, TxOptions,
};
use callbind_primitives::{Address, ChainId, Eth, MessageIdentifier, Uint128, H256, U256};

abi_struct! {
    #[derive(Debug, Clone)]
    pub struct WithdrawalTransaction {
        pub nonce: U256,
        pub sender: Address,
        pub target: Address,
        pub value: U256,
        pub gas_limit: U256,
        pub data: Vec<u8>,
    }
}

abi_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct GameData {
        pub game_type: u32,
        pub root_claim: H256,
        pub extra_data: Vec<u8>,
    }
}

contract_bindings! {
    /// Withdrawal portal
    #[derive(Debug, Clone)]
    pub struct Portal {
        fn finalize_withdrawal_transaction(tx: WithdrawalTransaction);
        fn game_data(index: U256) -> GameData;
        fn required_bond["getRequiredBond"](amount: Option<Uint128>) -> Uint128;
        fn validate_message(id: MessageIdentifier, msg_hash: H256);
    }
}

contract_bindings! {
    pub struct Inbox {
        fn latest_identifier() -> MessageIdentifier;
    }
}

contract_bindings! {
    #[derive(Debug)]
    pub struct Broken {
        fn version() -> String;
        fn at(index: usize) -> U256;
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            "callbind_contract=debug,callbind_abi=debug",
        ))
        .with_test_writer()
        .try_init();
}

fn withdrawal() -> WithdrawalTransaction {
    let sender = Address::from_hex("0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65").unwrap();
    WithdrawalTransaction {
        nonce: U256::one() << 240usize,
        sender,
        target: sender,
        value: U256::from(500_000_000_000u64),
        gas_limit: U256::from(21_000u64),
        data: vec![],
    }
}

fn portal(backend: Arc<MockBackend>) -> Portal {
    let context = BindingContext::new(Address::from_bytes([0x42; 20])).with_backend(backend);
    Portal::bind(&context).unwrap()
}

const GAME_DATA: &str = concat!(
    "00000000000000000000000000000000000000000000000000000000000000fe",
    "c0ced67668cc6e8e63517245aa7e34053a1332eb4303f3169b6051810e277036",
    "0000000000000000000000000000000000000000000000000000000000000060",
    "0000000000000000000000000000000000000000000000000000000000000020",
    "0000000000000000000000000000000000000000000000000000000000000015"
);

// ==================== Binding ====================

#[test]
fn test_bind_maps_signatures() {
    init_tracing();
    let portal = portal(Arc::new(MockBackend::new()));
    let signatures: Vec<&str> = portal
        .methods()
        .into_iter()
        .map(|m| m.signature.as_str())
        .collect();
    assert_eq!(
        signatures,
        vec![
            "finalizeWithdrawalTransaction((uint256,address,address,uint256,uint256,bytes))",
            "gameData(uint256)",
            "getRequiredBond(uint128)",
            "validateMessage((address,uint256,uint256,uint256,uint256),bytes32)",
        ]
    );
    assert_eq!(portal.abi()[0].inputs[0].kind, "tuple");
    assert_eq!(portal.abi()[1].outputs.len(), 3);
}

#[test]
fn test_bind_rejects_unsized_integer() {
    let err = Broken::bind(&BindingContext::new(Address::ZERO)).unwrap_err();
    assert!(matches!(err, BindError::Type { ref method, .. } if method == "at"));
}

// ==================== Encoding ====================

#[test]
fn test_finalize_call_data() {
    let portal = portal(Arc::new(MockBackend::new()));
    let data = portal
        .finalize_withdrawal_transaction(withdrawal())
        .calldata()
        .unwrap();
    let expected = concat!(
        "8c3152e9",
        "0000000000000000000000000000000000000000000000000000000000000020",
        "0001000000000000000000000000000000000000000000000000000000000000",
        "00000000000000000000000015d34aaf54267db7d7c367839aaf71a00a2c6a65",
        "00000000000000000000000015d34aaf54267db7d7c367839aaf71a00a2c6a65",
        "000000000000000000000000000000000000000000000000000000746a528800",
        "0000000000000000000000000000000000000000000000000000000000005208",
        "00000000000000000000000000000000000000000000000000000000000000c0",
        "0000000000000000000000000000000000000000000000000000000000000000"
    );
    assert_eq!(hex::encode(data), expected);
}

#[test]
fn test_identifier_argument_layout() {
    let portal = portal(Arc::new(MockBackend::new()));
    let id = MessageIdentifier {
        origin: Address::from_bytes([0x11; 20]),
        block_number: 7,
        log_index: 2,
        timestamp: 1_748_947_476,
        chain_id: 901u64.into(),
    };
    let data = portal
        .validate_message(id, H256::from_bytes([0xab; 32]))
        .calldata()
        .unwrap();
    assert_eq!(data.len(), 4 + 6 * 32);
    assert_eq!(data[4 + 31], 0x11);
    assert_eq!(data[4 + 32 + 31], 7);
    assert_eq!(&data[4 + 4 * 32 + 30..4 + 5 * 32], &[0x03, 0x85]);
    assert_eq!(data[4 + 5 * 32], 0xab);
}

// ==================== Evaluation ====================

#[tokio::test]
async fn test_read_struct_returned_as_separate_values() {
    init_tracing();
    let backend = Arc::new(MockBackend::new());
    let portal = portal(backend.clone());
    let selector = portal.methods()[1].selector;
    backend.set_response(selector, hex::decode(GAME_DATA).unwrap());

    let game = portal.game_data(U256::from(3)).read().await.unwrap();
    assert_eq!(game.game_type, 254);
    assert_eq!(game.extra_data.len(), 32);
    assert_eq!(game.extra_data[31], 0x15);

    let recorded = backend.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].to, Address::from_bytes([0x42; 20]));
    assert_eq!(recorded[0].data.len(), 36);
    assert_eq!(recorded[0].data[35], 3);
}

#[tokio::test]
async fn test_write_submits_call_data() {
    let backend = Arc::new(MockBackend::new());
    let portal = portal(backend.clone());
    let opts = TxOptions {
        value: Eth::gwei(1),
        ..Default::default()
    };

    let call = portal.finalize_withdrawal_transaction(withdrawal());
    let data = call.calldata().unwrap();
    let receipt = call.write(&opts).await.unwrap();
    assert!(receipt.status);
    assert!(receipt.gas_used > 21_000);

    let recorded = backend.recorded();
    assert_eq!(recorded[0].data, data);
    assert_eq!(recorded[0].opts, Some(opts));
}

#[tokio::test]
async fn test_overflow_policy_from_context() {
    let backend = Arc::new(MockBackend::new());
    // blockNumber word does not fit a u64
    let mut data = vec![0u8; 5 * 32];
    data[31] = 0x11;
    data[32] = 1;
    data[2 * 32 + 31] = 4;
    data[4 * 32 + 31] = 10;
    let strict = Inbox::bind(&BindingContext::new(Address::ZERO).with_backend(backend.clone()))
        .unwrap();
    backend.set_response(strict.methods()[0].selector, data);

    let err = strict.latest_identifier().read().await.unwrap_err();
    assert!(matches!(err, CallError::Decode(DecodeError::Overflow(_))));

    let context = BindingContext::new(Address::ZERO)
        .with_backend(backend)
        .with_config(CodecConfig::legacy());
    let legacy = Inbox::bind(&context).unwrap();
    let id = legacy.latest_identifier().read().await.unwrap();
    assert_eq!(id.block_number, 0);
    assert_eq!(id.log_index, 4);
    assert_eq!(id.chain_id, ChainId::new(10));
    assert_eq!(id.origin, Address::from_bytes({
        let mut origin = [0u8; 20];
        origin[19] = 0x11;
        origin
    }));
}

#[tokio::test]
async fn test_out_of_width_return_rejected() {
    let backend = Arc::new(MockBackend::new());
    let portal = portal(backend.clone());
    let mut word = vec![0u8; 32];
    word[0] = 1;
    backend.set_response(portal.methods()[2].selector, word);

    let err = portal.required_bond(None).read().await.unwrap_err();
    assert!(matches!(err, CallError::Decode(DecodeError::InvalidData(_))));
}

#[tokio::test]
async fn test_call_errors() {
    let offline = Portal::bind(&BindingContext::new(Address::ZERO)).unwrap();
    let err = offline.game_data(U256::one()).read().await.unwrap_err();
    assert!(matches!(err, CallError::NoBackend));

    let portal = portal(Arc::new(MockBackend::new()));
    let err = portal.game_data(U256::one()).read().await.unwrap_err();
    assert!(matches!(err, CallError::Backend(BackendError::NoResponse(_))));
}
