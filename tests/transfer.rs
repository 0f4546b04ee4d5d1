//! Transfer semantics through the public API.

use attr_transfer::prelude::*;

fn array<T: Scalar>(name: &str, comps: usize, values: Vec<T>) -> AnyArray {
    DataArray::from_vec(name, comps, values).unwrap().into_any()
}

fn values<T: Scalar>(list: &mut ArrayList, id: PairId) -> Vec<T> {
    list.output(id).unwrap().downcast::<T>().unwrap().values().to_vec()
}

fn single(list: &mut ArrayList, input: &AnyArray, num_out: usize, promotion: Promotion) -> PairId {
    list.add_array_pair(num_out, input, input.name(), 0.0, promotion)
        .unwrap()
        .unwrap()
}

#[test]
fn scenario_int32_interpolation() {
    let input = array("t", 1, vec![10i32, 20, 30]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 1, Promotion::None);

    list.interpolate(&[0, 1], &[0.5, 0.5], 0);
    assert_eq!(values::<i32>(&mut list, id), vec![15]);
}

#[test]
fn scenario_promoted_average() {
    let input = array("t", 1, vec![1i32, 2, 3]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 1, Promotion::Float64);

    list.average(&[0, 1, 2], 0);
    assert_eq!(values::<f64>(&mut list, id), vec![2.0]);
}

#[test]
fn scenario_null_value_overrides_prior_writes() {
    let input = array("uv", 2, vec![0.5f32, 0.25, 1.0, 2.0, 3.0, 4.0]);
    let mut list = ArrayList::new();
    let id = list
        .add_array_pair(3, &input, "uv", -1.0, Promotion::None)
        .unwrap()
        .unwrap();

    list.copy(1, 2);
    list.assign_null_value(2);
    let out = values::<f32>(&mut list, id);
    assert_eq!(&out[4..6], &[-1.0, -1.0]);
}

#[test]
fn copy_casts_every_component() {
    let input = array("c", 3, vec![1u16, 2, 3, 400, 500, 600]);
    let mut list = ArrayList::new();
    let same = single(&mut list, &input, 2, Promotion::None);
    let wide = single(&mut list, &input, 2, Promotion::Float32);

    list.copy(1, 0);
    list.copy(0, 1);
    assert_eq!(values::<u16>(&mut list, same), vec![400, 500, 600, 1, 2, 3]);
    assert_eq!(
        values::<f32>(&mut list, wide),
        vec![400.0, 500.0, 600.0, 1.0, 2.0, 3.0]
    );
}

#[test]
fn edge_endpoints_match_copy() {
    let input = array("e", 1, vec![-7i8, 100]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 4, Promotion::None);

    list.interpolate_edge(0, 1, 0.0, 0);
    list.copy(0, 1);
    list.interpolate_edge(0, 1, 1.0, 2);
    list.copy(1, 3);

    let out = values::<i8>(&mut list, id);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[2], out[3]);
}

#[test]
fn weighted_average_equals_interpolate() {
    let input = array("w", 2, vec![1.0f64, 10.0, 2.0, 20.0, 4.0, 40.0]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 2, Promotion::None);

    let ids = [0, 1, 2];
    let weights = [0.125, 0.375, 0.5];
    list.interpolate(&ids, &weights, 0);
    list.weighted_average(&ids, &weights, 1);

    let out = values::<f64>(&mut list, id);
    assert_eq!(&out[0..2], &out[2..4]);
}

#[test]
fn weighted_average_does_not_renormalize() {
    let input = array("w", 1, vec![10.0f64, 20.0]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 1, Promotion::None);

    list.weighted_average(&[0, 1], &[1.0, 1.0], 0);
    assert_eq!(values::<f64>(&mut list, id), vec![30.0]);
}

#[test]
fn realloc_preserves_and_extends() {
    let input = array("r", 1, vec![5i64, 6]);
    let mut list = ArrayList::builder()
        .null_value(-9.0)
        .promotion(Promotion::None)
        .build()
        .unwrap();
    let id = list
        .add_array_pair(2, &input, "r", -9.0, Promotion::None)
        .unwrap()
        .unwrap();

    list.copy(1, 0);
    list.copy(0, 1);
    list.realloc(4);
    list.realloc(1);
    list.interpolate(&[0, 1], &[0.5, 0.5], 3);

    assert_eq!(list.output_capacity(), Some(4));
    assert_eq!(values::<i64>(&mut list, id), vec![6, 5, -9, 5]);
}

#[test]
fn excluded_array_never_receives_writes() {
    let kept = array("kept", 1, vec![1.0f32, 2.0]);
    let dropped = array("dropped", 1, vec![3.0f32, 4.0]);

    let mut list = ArrayList::builder().exclude(&dropped).build().unwrap();
    let kept_id = single(&mut list, &kept, 1, Promotion::None);
    assert!(list
        .add_request(PairRequest::new(&dropped).num_tuples(1))
        .unwrap()
        .is_none());

    list.average(&[0, 1], 0);
    assert_eq!(list.number_of_arrays(), 1);
    assert_eq!(values::<f32>(&mut list, kept_id), vec![1.5]);

    let outputs = list.into_attribute_set();
    assert!(outputs.get("dropped").is_none());
    assert!(outputs.get("kept").is_some());
}

#[test]
fn fan_out_reaches_every_pair_in_order() {
    let a = array("a", 1, vec![0u8, 200]);
    let b = array("b", 2, vec![0.0f64, 1.0, 10.0, 11.0]);
    let mut list = ArrayList::new();
    single(&mut list, &a, 1, Promotion::None);
    single(&mut list, &b, 1, Promotion::None);

    list.interpolate_edge(0, 1, 0.25, 0);

    let outputs = list.into_outputs();
    assert_eq!(outputs[0].name(), "a");
    assert_eq!(outputs[0].downcast::<u8>().unwrap().values(), &[50]);
    assert_eq!(outputs[1].downcast::<f64>().unwrap().values(), &[2.5, 3.5]);
}

#[test]
fn bulk_registration_promotes_templates() {
    let mut input = AttributeSet::new();
    input.add_array(array("density", 1, vec![1i32, 2, 4]));
    input.add_array(array("velocity", 3, vec![0.0f64; 9]));

    let mut templates = AttributeSet::new();
    templates.add_array(DataArray::<i32>::new("density", 1));
    templates.add_array(DataArray::<f64>::new("velocity", 3));

    let mut list = ArrayList::builder()
        .promotion(Promotion::Float64)
        .build()
        .unwrap();
    assert_eq!(list.add_arrays(2, &input, &templates), 2);

    list.average(&[0, 1, 2], 0);
    let outputs = list.into_attribute_set();
    let density = outputs.get("density").unwrap().downcast::<f64>().unwrap();
    assert!((density.value(0, 0) - 7.0 / 3.0).abs() < 1e-12);
    assert_eq!(outputs.get("velocity").unwrap().data_type(), DataType::Float64);
}

#[test]
fn custom_pairs_join_the_fan_out() {
    let input = std::sync::Arc::new(DataArray::from_vec("p", 1, vec![3u32, 9]).unwrap());
    let mut list = ArrayList::new();
    let id = list.add_pair(Box::new(TypedPair::allocate(input, "p", 1, 0u32)));

    list.average(&[0, 1], 0);
    assert_eq!(values::<u32>(&mut list, id), vec![6]);
}

#[test]
fn ndarray_input_feeds_a_pair() {
    let m = ndarray::array![[1.0f32, 2.0], [3.0, 6.0]];
    let input = m.to_data_array("xy", 2).unwrap().into_any();
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 1, Promotion::None);

    list.interpolate_edge(0, 1, 0.5, 0);
    assert_eq!(values::<f32>(&mut list, id), vec![2.0, 4.0]);
}

macro_rules! copy_round_trip {
    ($($name:ident: $ty:ty => $tag:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let raw: Vec<$ty> =
                    vec![0 as $ty, 1 as $ty, 7 as $ty, 100 as $ty, <$ty>::MAX, <$ty>::MIN];
                let input = array(stringify!($name), 2, raw.clone());
                let mut list = ArrayList::new();
                let same = single(&mut list, &input, 3, Promotion::None);
                let wide = single(&mut list, &input, 3, Promotion::Float64);
                assert_eq!(list.pair(same).unwrap().output_type(), DataType::$tag);

                list.copy(2, 0);
                list.copy(0, 1);
                list.copy(1, 2);
                let expected: Vec<$ty> = [4, 5, 0, 1, 2, 3].iter().map(|&i| raw[i]).collect();
                assert_eq!(values::<$ty>(&mut list, same), expected);

                let wide_out = values::<f64>(&mut list, wide);
                let wide_expected: Vec<f64> = expected.iter().map(|&v| v as f64).collect();
                assert_eq!(wide_out, wide_expected);
            }
        )*
    };
}

copy_round_trip!(
    copy_round_trip_i8: i8 => Int8,
    copy_round_trip_u8: u8 => UInt8,
    copy_round_trip_i16: i16 => Int16,
    copy_round_trip_u16: u16 => UInt16,
    copy_round_trip_i32: i32 => Int32,
    copy_round_trip_u32: u32 => UInt32,
    copy_round_trip_i64: i64 => Int64,
    copy_round_trip_u64: u64 => UInt64,
    copy_round_trip_f32: f32 => Float32,
    copy_round_trip_f64: f64 => Float64,
);

#[test]
fn promoted_edge_endpoints_match_copy() {
    let input = array("big", 1, vec![i64::MAX - 3, -1_234_567_890_123]);
    let mut list = ArrayList::new();
    let id = single(&mut list, &input, 4, Promotion::Float64);

    list.interpolate_edge(0, 1, 0.0, 0);
    list.copy(0, 1);
    list.interpolate_edge(0, 1, 1.0, 2);
    list.copy(1, 3);

    let out = values::<f64>(&mut list, id);
    assert_eq!(out[0].to_bits(), out[1].to_bits());
    assert_eq!(out[2].to_bits(), out[3].to_bits());
    assert_eq!(out[3], -1_234_567_890_123.0);
}

#[test]
fn self_interpolating_subdivision_reads_new_records() {
    let mut attrs = AttributeSet::new();
    attrs.add_array(array("level", 1, vec![2.0f64, 4.0]));
    let mut list = ArrayList::new();
    assert_eq!(list.add_self_interpolating_arrays(4, &attrs), 1);

    // Step one refines the original edge; step two reads the new midpoint.
    list.interpolate_output(&[0, 1], &[0.5, 0.5], 2);
    list.interpolate(&[1, 2], &[0.5, 0.5], 3);
    list.realloc(6);
    list.interpolate_edge(2, 3, 0.5, 4);
    list.average(&[0, 4], 5);

    let out = list.into_outputs().remove(0);
    assert_eq!(
        out.downcast::<f64>().unwrap().values(),
        &[2.0, 4.0, 3.0, 3.5, 3.25, 2.625]
    );
}
