use num_bigint::BigInt;
use num_traits::{One, Zero};
use ringmul::{Parameters, RingRNS};

/// X^e as a ring element with N0 = 4 and the default conductor M1 = 257.
fn monomial(ring: &RingRNS, e: usize) -> Vec<BigInt> {
    let mut a: Vec<BigInt> = vec![BigInt::zero(); ring.n()];
    a[e] = BigInt::one();
    a
}

fn unit(ring: &RingRNS, i: usize, value: BigInt) -> Vec<BigInt> {
    let mut a: Vec<BigInt> = vec![BigInt::zero(); ring.n()];
    a[i] = value;
    a
}

#[test]
fn x_monomials_and_negacyclic_wrap() {
    let params: Parameters = Parameters::generate(2, 8, 55, 2).unwrap();
    let ring: RingRNS = RingRNS::new(&params);
    assert_eq!(ring.n0(), 4);
    assert_eq!(ring.n1(), 256);
    let q: BigInt = BigInt::from(1u64 << 40);

    for np in 1..=2 {
        assert_eq!(
            ring.mul(&monomial(&ring, 1), &monomial(&ring, 2), np, &q),
            monomial(&ring, 3)
        );
        assert_eq!(
            ring.mul(&monomial(&ring, 3), &monomial(&ring, 1), np, &q),
            unit(&ring, 0, &q - 1)
        );
        assert_eq!(
            ring.square(&monomial(&ring, 2), np, &q),
            unit(&ring, 0, &q - 1)
        );
    }
}

#[test]
fn y_monomials_wrap_through_the_cyclotomic() {
    let params: Parameters = Parameters::generate(2, 8, 55, 1).unwrap();
    let ring: RingRNS = RingRNS::new(&params);
    let n0: usize = ring.n0();
    let q: BigInt = BigInt::from(1u64 << 40);

    // Y * Y^255 = Y^256 = -(1 + Y + ... + Y^255)
    let want: Vec<BigInt> = (0..ring.n())
        .map(|i| if i % n0 == 0 { &q - 1 } else { BigInt::zero() })
        .collect();
    let y: Vec<BigInt> = unit(&ring, n0, BigInt::one());
    let y255: Vec<BigInt> = unit(&ring, 255 * n0, BigInt::one());
    assert_eq!(ring.mul(&y, &y255, 1, &q), want);

    // Y^128 * Y^129 = Y^257 = 1
    let y128: Vec<BigInt> = unit(&ring, 128 * n0, BigInt::one());
    let y129: Vec<BigInt> = unit(&ring, 129 * n0, BigInt::one());
    assert_eq!(ring.mul(&y128, &y129, 1, &q), unit(&ring, 0, BigInt::one()));
}
