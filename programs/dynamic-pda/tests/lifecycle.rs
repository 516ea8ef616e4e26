use dynamic_pda::derive::derive;
use dynamic_pda::instruction;
use dynamic_pda::state::{RecordBody, MAX_PAYLOAD_LEN};
use dynamic_pda::{Bank, RecordClass, RegistryClient, RegistryError};
use solana_program::{pubkey::Pubkey, rent::Rent};

const STARTING_LAMPORTS: u64 = 10_000_000_000;

fn setup() -> (RegistryClient<Bank>, Pubkey) {
    let mut bank = Bank::default();
    let user = Pubkey::new_unique();
    bank.airdrop(&user, STARTING_LAMPORTS).unwrap();
    (RegistryClient::new(bank), user)
}

fn expected_reserve(seed: &str, payload: &[u8]) -> u64 {
    let body = RecordBody {
        seed: seed.to_string(),
        payload: payload.to_vec(),
        authority: Pubkey::default(),
    };
    Rent::default().minimum_balance(body.space())
}

#[test]
fn five_records_three_closed_in_arbitrary_order() {
    let (mut client, user) = setup();
    let seeds = ["pda1", "pda2", "pda3", "pda4", "pda5"];
    let payloads: [&[u8]; 5] = [
        b"first record data",
        b"second record data",
        b"third record data",
        b"fourth record data",
        b"fifth record data",
    ];

    let mut addresses = Vec::new();
    for (seed, payload) in seeds.iter().zip(payloads) {
        let address = client.create_record(seed, payload, &user, &user).unwrap();
        let (derived, _) = derive(b"dynamic_pda", seed, client.program_id()).unwrap();
        assert_eq!(address, derived);
        addresses.push(address);
    }

    for (i, address) in addresses.iter().enumerate() {
        let snapshot = client.read_record(address).unwrap();
        assert_eq!(snapshot.seed, seeds[i]);
        assert_eq!(snapshot.payload, payloads[i]);
        assert_eq!(snapshot.authority, user);
    }

    let close_order = [3usize, 0, 2];
    for &i in &close_order {
        let receiver = Pubkey::new_unique();
        let reserved = client.executor().balance(&addresses[i]);
        assert_eq!(reserved, expected_reserve(seeds[i], payloads[i]));

        let reclaimed = client.close_record(seeds[i], &receiver, &user).unwrap();
        assert_eq!(reclaimed, reserved);
        assert_eq!(client.executor().balance(&receiver), reserved);
        assert_eq!(client.executor().balance(&addresses[i]), 0);
    }

    for &i in &close_order {
        assert_eq!(
            client.read_record(&addresses[i]),
            Err(RegistryError::NotFound)
        );
        assert_eq!(
            client.get_record_info(&addresses[i]),
            Err(RegistryError::NotFound)
        );
        assert_eq!(
            client.close_record(seeds[i], &user, &user),
            Err(RegistryError::NotFound)
        );
    }

    for i in [1usize, 4] {
        let snapshot = client.read_record(&addresses[i]).unwrap();
        assert_eq!(snapshot.payload, payloads[i]);
    }
}

#[test]
fn second_create_with_same_seed_fails() {
    let (mut client, user) = setup();
    client.create_record("pda1", b"original", &user, &user).unwrap();
    let balance = client.executor().balance(&user);

    assert_eq!(
        client.create_record("pda1", b"a different payload", &user, &user),
        Err(RegistryError::DuplicateSeed)
    );
    assert_eq!(client.executor().balance(&user), balance);

    let address = derive(b"dynamic_pda", "pda1", client.program_id()).unwrap().0;
    assert_eq!(client.read_record(&address).unwrap().payload, b"original");
}

#[test]
fn read_after_create_round_trips() {
    let (mut client, user) = setup();
    let authority = Pubkey::new_unique();
    let payload = [0u8, 1, 2, 254, 255];

    let address = client.create_record("round", &payload, &authority, &user).unwrap();
    let snapshot = client.read_record(&address).unwrap();
    let (_, bump) = derive(b"dynamic_pda", "round", client.program_id()).unwrap();

    assert_eq!(snapshot.address, address);
    assert_eq!(snapshot.class, RecordClass::Dynamic);
    assert_eq!(snapshot.bump, bump);
    assert_eq!(snapshot.seed, "round");
    assert_eq!(snapshot.payload, payload);
    assert_eq!(snapshot.authority, authority);
    assert_eq!(snapshot.reserved_balance, expected_reserve("round", &payload));
    assert_eq!(
        client.executor().balance(&user),
        STARTING_LAMPORTS - snapshot.reserved_balance
    );
}

#[test]
fn info_reports_header_without_payload() {
    let (mut client, user) = setup();
    let address = client.create_record("info", b"twelve bytes", &user, &user).unwrap();
    let info = client.get_record_info(&address).unwrap();

    assert_eq!(info.address, address);
    assert_eq!(info.seed, "info");
    assert_eq!(info.authority, user);
    assert_eq!(info.payload_len, 12);
    assert_eq!(info.reserved_balance, client.executor().balance(&address));
}

#[test]
fn info_on_missing_or_foreign_accounts() {
    let (mut client, user) = setup();
    assert_eq!(
        client.get_record_info(&Pubkey::new_unique()),
        Err(RegistryError::NotFound)
    );
    assert_eq!(client.get_record_info(&user), Err(RegistryError::IllegalOwner));
}

#[test]
fn dynamic_close_on_normal_record_is_wrong_class() {
    let (mut client, user) = setup();
    let normal = client.create_normal_record("pda1", b"normal data", &user, &user).unwrap();
    let dynamic = client.create_record("pda1", b"dynamic data", &user, &user).unwrap();
    assert_ne!(normal, dynamic);

    let before = client.executor().ledger().account(&normal).cloned();
    let user_before = client.executor().balance(&user);

    let ix = instruction::close_record_at(client.program_id(), &normal, "pda1", &user, &user);
    assert_eq!(client.call::<u64>(&ix), Err(RegistryError::WrongRecordClass));
    assert_eq!(
        client.read_record(&normal),
        Err(RegistryError::WrongRecordClass)
    );

    assert_eq!(client.executor().ledger().account(&normal).cloned(), before);
    assert_eq!(client.executor().balance(&user), user_before);
    let snapshot = client.read_record_as(&normal, RecordClass::Normal).unwrap();
    assert_eq!(snapshot.payload, b"normal data");
}

#[test]
fn normal_records_cannot_be_closed() {
    let (mut client, user) = setup();
    let normal = client.create_normal_record("keep", b"stays", &user, &user).unwrap();
    let before = client.executor().ledger().account(&normal).cloned();
    let receiver = Pubkey::new_unique();

    assert_eq!(
        client.close_normal_record("keep", &receiver, &user),
        Err(RegistryError::NotClosable)
    );
    assert_eq!(client.executor().ledger().account(&normal).cloned(), before);
    assert_eq!(client.executor().balance(&receiver), 0);

    let info = client.get_record_info_as(&normal, RecordClass::Normal).unwrap();
    assert_eq!(info.seed, "keep");
}

#[test]
fn close_requires_the_stored_authority() {
    let (mut client, user) = setup();
    let address = client.create_record("owned", b"data", &user, &user).unwrap();
    let intruder = Pubkey::new_unique();

    assert_eq!(
        client.close_record("owned", &intruder, &intruder),
        Err(RegistryError::Unauthorized)
    );
    assert_eq!(client.executor().balance(&intruder), 0);
    assert!(client.read_record(&address).is_ok());

    assert!(client.close_record("owned", &user, &user).is_ok());
}

#[test]
fn close_rejects_address_not_derived_from_seed() {
    let (mut client, user) = setup();
    client.create_record("pda1", b"one", &user, &user).unwrap();
    let other = client.create_record("pda2", b"two", &user, &user).unwrap();

    let ix = instruction::close_record_at(client.program_id(), &other, "pda1", &user, &user);
    assert_eq!(
        client.call::<u64>(&ix),
        Err(RegistryError::InvalidRecordAddress)
    );
    assert!(client.read_record(&other).is_ok());
}

#[test]
fn closed_address_cannot_be_recreated() {
    let (mut client, user) = setup();
    client.create_record("once", b"data", &user, &user).unwrap();
    client.close_record("once", &user, &user).unwrap();

    assert_eq!(
        client.create_record("once", b"data", &user, &user),
        Err(RegistryError::RecordClosed)
    );
}

#[test]
fn receiver_cannot_be_the_record() {
    let (mut client, user) = setup();
    let address = client.create_record("self", b"data", &user, &user).unwrap();
    assert_eq!(
        client.close_record("self", &address, &user),
        Err(RegistryError::InvalidReceiver)
    );
    assert!(client.read_record(&address).is_ok());
}

#[test]
fn bounds_are_enforced() {
    let (mut client, user) = setup();
    let long_seed = "s".repeat(33);
    assert_eq!(
        client.create_record(&long_seed, b"data", &user, &user),
        Err(RegistryError::PayloadTooLarge)
    );
    assert_eq!(
        client.create_record("big", &[7u8; 101], &user, &user),
        Err(RegistryError::PayloadTooLarge)
    );
    assert!(client.create_record("fits", &[7u8; 100], &user, &user).is_ok());
}

#[test]
fn payer_without_funds_is_rejected() {
    let (mut client, user) = setup();
    let poor = Pubkey::new_unique();
    client.executor_mut().airdrop(&poor, 1_000).unwrap();

    assert_eq!(
        client.create_record("pda1", b"data", &user, &poor),
        Err(RegistryError::InsufficientFunds)
    );
    assert_eq!(client.executor().balance(&poor), 1_000);
}

#[test]
fn initialize_sets_payload_limit_once() {
    let (mut client, admin) = setup();
    assert_eq!(
        client.initialize(&admin, MAX_PAYLOAD_LEN + 1),
        Err(RegistryError::PayloadTooLarge)
    );

    client.initialize(&admin, 16).unwrap();
    assert_eq!(
        client.initialize(&admin, 32),
        Err(RegistryError::AlreadyInitialized)
    );

    assert_eq!(
        client.create_record("pda1", &[1u8; 17], &admin, &admin),
        Err(RegistryError::PayloadTooLarge)
    );
    assert!(client.create_record("pda1", &[1u8; 16], &admin, &admin).is_ok());
}

#[test]
fn raised_limit_allows_larger_payloads() {
    let (mut client, admin) = setup();
    client.initialize(&admin, 512).unwrap();
    let address = client.create_record("large", &[3u8; 512], &admin, &admin).unwrap();
    assert_eq!(client.get_record_info(&address).unwrap().payload_len, 512);
}

#[test]
fn balances_are_conserved() {
    let (mut client, user) = setup();
    let receiver = Pubkey::new_unique();
    let total = client.executor().ledger().total_lamports();

    for seed in ["a", "b", "c", "d"] {
        client.create_record(seed, seed.as_bytes(), &user, &user).unwrap();
    }
    client.close_record("b", &receiver, &user).unwrap();
    client.close_record("d", &receiver, &user).unwrap();

    let debited = STARTING_LAMPORTS - client.executor().balance(&user);
    let credited = client.executor().balance(&receiver);
    let reserved = client.executor().ledger().reserved_by(client.program_id());
    assert_eq!(debited, credited + reserved);
    assert_eq!(client.executor().ledger().total_lamports(), total);
}

#[test]
fn record_cannot_pay_for_another_record() {
    let (mut client, user) = setup();
    let first = client.create_record("a", b"first", &user, &user).unwrap();
    let reserved = client.executor().balance(&first);

    assert_eq!(
        client.create_record("b", b"second", &user, &first),
        Err(RegistryError::IllegalOwner)
    );
    assert_eq!(client.executor().balance(&first), reserved);
    assert_eq!(client.close_record("a", &user, &user), Ok(reserved));
}

#[test]
fn record_cannot_receive_a_close() {
    let (mut client, user) = setup();
    let first = client.create_record("a", b"first", &user, &user).unwrap();
    let second = client.create_record("b", b"second", &user, &user).unwrap();
    let reserved = client.executor().balance(&second);

    assert_eq!(
        client.close_record("a", &second, &user),
        Err(RegistryError::IllegalOwner)
    );
    assert_eq!(client.executor().balance(&second), reserved);
    assert_eq!(
        client.read_record(&second).unwrap().reserved_balance,
        reserved
    );
    assert!(client.read_record(&first).is_ok());
}

#[test]
fn lamports_paid_to_an_unused_address_do_not_block_its_seed() {
    let (mut client, user) = setup();
    let (pending, _) = derive(b"dynamic_pda", "pending", client.program_id()).unwrap();
    client.create_record("mine", b"data", &user, &user).unwrap();
    let paid = client.close_record("mine", &pending, &user).unwrap();
    let user_before = client.executor().balance(&user);
    let total = client.executor().ledger().total_lamports();

    let address = client.create_record("pending", b"later", &user, &user).unwrap();
    assert_eq!(address, pending);

    let reserve = expected_reserve("pending", b"later");
    let snapshot = client.read_record(&address).unwrap();
    assert_eq!(snapshot.payload, b"later");
    assert_eq!(snapshot.reserved_balance, paid.max(reserve));
    assert_eq!(
        client.executor().balance(&user),
        user_before - reserve.saturating_sub(paid)
    );
    assert_eq!(client.executor().ledger().total_lamports(), total);

    assert_eq!(
        client.close_record("pending", &user, &user),
        Ok(snapshot.reserved_balance)
    );
}
