use zkfocil_vectors::{
    codec::{reduce_mod_order, scalar_to_bytes, ByteOrder},
    derive_key_image, derive_public_key,
    format::{render_test, render_toml, ProverInputs},
    hash::{blake2s_256, hash_public_key},
    merkle::index_bits,
    CurvePoint, DigestFn, GeneratorInputs, GeneratorSettings, HashFunction, MerkleTree,
    TestVector, VectorGenerator, VectorRecord, VALIDATOR_TREE_DEPTH,
};

const GENERATOR_X_LE: &str = "bbc622db0af03afbef1a7af93fe8556c58ac1b173f3a4ea105b974974f8c68c30faca94f8c63952694d79731a7d3f117";
const GENERATOR_Y_LE: &str = "e1e7c5462923aa0ce48a88a244c73cd0edb3042ccb18db00f60ad0d595e0f5fce48a1d74ed309ea0f1a0aae381f4b308";

// sk = 1, bp = 0
const KEY_IMAGE_X_LE: &str = "ecbf0ec2a95ed977f3c5e16324a222f0f777adc786f8580499cb17045476820f6a3332a0e7a3d85ee74df666d4bdfd02";
const KEY_IMAGE_Y_LE: &str = "ed44b666a54be87b6747eef8c3cc3b775227cf072e56c117aff209a3f933f7c4dd012cf6e7e2b0ea28eaa8b6e235c705";

// sk = 2, bp = 00 01 .. 1f
const TWO_PK_X_LE: &str = "4e0fbf29558c9ac3427c1c8fbb758fe22aa658c30a2d90432501289130db21970c45a950ebc8088846674d90eacb7205";
const TWO_PK_Y_LE: &str = "289d7479198886ba1bbd16cdd4d9564c6ad75f1d02b93bf761e47086cb3eba22388e9d7773a6fd22a373c6ab8c9d6a16";
const TWO_KEY_IMAGE_X_LE: &str = "c5f7b3609913329036e468e9884e188e28d56697484e40f15443d0f0b41354266dbe17f0d028fa70c2d23717193de512";
const TWO_KEY_IMAGE_Y_LE: &str = "b8ee22d8e0f631cf9129ac03085013b581cdc0640fa2986e4af41c75ed4038f430c41f07049c341b417d5601a0453c08";

// Leaves [0x01; 32], [0x02; 32], H(generator), [0x04; 32]
const FOUR_LEAF_ROOT: &str = "105e9f1bb2b5176326b86dc9ced5ae75d45982d661c33167c8be96b10f2f25f9";
const FOUR_LEAF_LEFT_NODE: &str = "280569932378c99f448df37e893f062fab951bea53515634b7875ae51e1954e7";

fn be_scalar_bytes(value: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[31] = value;
    bytes
}

fn pinned_inputs() -> GeneratorInputs {
    GeneratorInputs {
        secret_key_hex: Some(format!("0x{}", hex::encode(be_scalar_bytes(1)))),
        block_params_hex: Some(format!("0x{}", "00".repeat(32))),
        target_index: Some(2),
    }
}

#[test]
fn test_reference_public_key_is_generator() {
    let pair = derive_public_key(&be_scalar_bytes(1)).unwrap();
    assert_eq!(pair.public_key, CurvePoint::generator());

    let (x, y) = pair.public_key.serialize_le().unwrap();
    assert_eq!(hex::encode(x), GENERATOR_X_LE);
    assert_eq!(hex::encode(y), GENERATOR_Y_LE);
}

#[test]
fn test_reference_key_image() {
    let key_image = derive_key_image(&be_scalar_bytes(1), &[0u8; 32]);
    let (x, y) = key_image.serialize_le().unwrap();
    assert_eq!(hex::encode(x), KEY_IMAGE_X_LE);
    assert_eq!(hex::encode(y), KEY_IMAGE_Y_LE);
}

#[test]
fn test_reference_key_image_matches_formula() {
    let sk = be_scalar_bytes(1);
    let mut preimage = sk.to_vec();
    preimage.extend_from_slice(&[0u8; 32]);
    let mut digest = blake2s_256(&preimage);
    digest.reverse();

    let expected = zkfocil_vectors::scalar_multiply(&reduce_mod_order(&digest));
    assert_eq!(derive_key_image(&sk, &[0u8; 32]), expected);
}

#[test]
fn test_second_reference_vector() {
    let block_params: [u8; 32] = std::array::from_fn(|i| i as u8);
    let pair = derive_public_key(&be_scalar_bytes(2)).unwrap();

    let (pk_x, pk_y) = pair.public_key.serialize_le().unwrap();
    assert_eq!(hex::encode(pk_x), TWO_PK_X_LE);
    assert_eq!(hex::encode(pk_y), TWO_PK_Y_LE);

    let (ki_x, ki_y) = derive_key_image(&pair.secret_key_bytes, &block_params)
        .serialize_le()
        .unwrap();
    assert_eq!(hex::encode(ki_x), TWO_KEY_IMAGE_X_LE);
    assert_eq!(hex::encode(ki_y), TWO_KEY_IMAGE_Y_LE);
}

#[test]
fn test_derivation_is_deterministic_across_calls() {
    let sk = hex::decode("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
        .unwrap();
    let first = derive_public_key(&sk).unwrap();
    let second = derive_public_key(&sk).unwrap();
    assert_eq!(first, second);

    let bp = [0x5a; 32];
    assert_eq!(
        derive_key_image(&first.secret_key_bytes, &bp),
        derive_key_image(&second.secret_key_bytes, &bp)
    );
}

#[test]
fn test_long_secret_key_is_reduced() {
    // 40-byte input reduces to the same key as its canonical 32-byte form.
    let long = [0xffu8; 40];
    let pair = derive_public_key(&long).unwrap();
    let canonical = scalar_to_bytes(&pair.secret_scalar, 32, ByteOrder::BigEndian).unwrap();
    assert_eq!(pair.secret_key_bytes.to_vec(), canonical);
    assert_eq!(derive_public_key(&canonical).unwrap(), pair);
}

#[test]
fn test_identity_leaf_digest() {
    let digest = hash_public_key(&CurvePoint::identity(), &HashFunction::Blake2s).unwrap();
    assert_eq!(digest, blake2s_256(&[0u8; 96]));
}

#[test]
fn test_four_leaf_reference_tree() {
    let pk_leaf = hash_public_key(&CurvePoint::generator(), &HashFunction::Blake2s).unwrap();
    let leaves = vec![[0x01; 32], [0x02; 32], pk_leaf, [0x04; 32]];
    let tree = MerkleTree::build(leaves.clone(), HashFunction::Blake2s).unwrap();

    assert_eq!(hex::encode(tree.root()), FOUR_LEAF_ROOT);

    let proof = tree.generate_proof(2).unwrap();
    assert_eq!(proof.siblings[0], leaves[3]);
    assert_eq!(hex::encode(proof.siblings[1]), FOUR_LEAF_LEFT_NODE);
    assert_eq!(
        proof.siblings[1],
        HashFunction::Blake2s.hash_pair(&leaves[0], &leaves[1])
    );
    assert_eq!(index_bits(2, 4).unwrap(), vec![false, true, false, false]);
}

#[test]
fn test_pinned_end_to_end_vector() {
    let settings = GeneratorSettings {
        tree_depth: VALIDATOR_TREE_DEPTH,
        leaf_count: 4,
        hash: HashFunction::Blake2s,
    };
    let vector = VectorGenerator::from_seed(settings, 0)
        .generate(&pinned_inputs())
        .unwrap();

    assert_eq!(vector.secret_key, be_scalar_bytes(1));
    assert_eq!(hex::encode(vector.public_key.x), GENERATOR_X_LE);
    assert_eq!(hex::encode(vector.key_image.x), KEY_IMAGE_X_LE);
    assert_eq!(hex::encode(vector.key_image.y), KEY_IMAGE_Y_LE);
    assert_eq!(
        vector.target_pk_hash,
        hash_public_key(&CurvePoint::generator(), &HashFunction::Blake2s).unwrap()
    );
    assert_eq!(vector.tree_depth, 2);
    assert_eq!(vector.merkle_path.len(), VALIDATOR_TREE_DEPTH);
    assert!(vector.merkle_path[2..].iter().all(|node| *node == [0u8; 32]));
    assert_eq!(&vector.index_bits[..2], &[false, true]);
    assert!(vector.index_bits[2..].iter().all(|bit| !bit));

    vector.validate(&HashFunction::Blake2s).unwrap();
}

#[test]
fn test_key_image_independent_of_tree() {
    let inputs = pinned_inputs();
    let small = VectorGenerator::from_seed(
        GeneratorSettings {
            tree_depth: 4,
            leaf_count: 3,
            hash: HashFunction::Blake2s,
        },
        11,
    )
    .generate(&inputs)
    .unwrap();
    let large = VectorGenerator::from_seed(
        GeneratorSettings {
            tree_depth: 10,
            leaf_count: 600,
            hash: HashFunction::Sha3,
        },
        12,
    )
    .generate(&inputs)
    .unwrap();

    assert_eq!(small.key_image, large.key_image);
    assert_eq!(small.public_key, large.public_key);
    assert_ne!(small.validator_root, large.validator_root);
}

#[test]
fn test_record_survives_json() {
    let vector = VectorGenerator::from_seed(GeneratorSettings::default(), 3)
        .generate(&GeneratorInputs::default())
        .unwrap();
    let json = VectorRecord::from(&vector).to_json_pretty().unwrap();

    let record: VectorRecord = serde_json::from_str(&json).unwrap();
    let restored = TestVector::try_from(&record).unwrap();
    assert_eq!(restored, vector);
    restored.validate(&HashFunction::Blake2s).unwrap();
}

#[test]
fn test_both_formats_carry_the_same_path() {
    let vector = VectorGenerator::from_seed(GeneratorSettings::default(), 21)
        .generate(&GeneratorInputs::default())
        .unwrap();

    let literal = render_test(&vector);
    let inputs: ProverInputs = toml::from_str(&render_toml(&vector).unwrap()).unwrap();

    assert_eq!(inputs.validator_merkle_path.len(), VALIDATOR_TREE_DEPTH);
    for node in &inputs.validator_merkle_path {
        assert!(literal.contains(&format!("[{}]", node.join(", "))));
    }

    let bits: Vec<bool> = inputs
        .validator_merkle_indices
        .iter()
        .map(|bit| bit == "1")
        .collect();
    assert_eq!(bits, vector.index_bits);
}
