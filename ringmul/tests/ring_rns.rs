use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use ringmul::{Error, Layout, NttPolyRNS, Parameters, PolyRNS, RingRNS};
use sampling::source::Source;

/// N0 = 4, N1 = 16, M1 = 17, three 50-bit primes.
fn small_ring() -> RingRNS {
    RingRNS::new(&Parameters::generate(2, 4, 50, 3).unwrap())
}

fn sample_small(source: &mut Source, n: usize, bound: u64) -> Vec<BigInt> {
    (0..n)
        .map(|_| BigInt::from(source.next_i64_centered(bound)))
        .collect()
}

fn sample_mod(source: &mut Source, n: usize, q: &BigInt) -> Vec<BigInt> {
    (0..n)
        .map(|_| {
            let x: BigInt = (0..3).fold(BigInt::zero(), |acc, _| {
                (acc << 64) + BigInt::from(source.next_i64() as u64)
            });
            x.mod_floor(q)
        })
        .collect()
}

fn reduce_mod(a: &[BigInt], q: &BigInt) -> Vec<BigInt> {
    a.iter().map(|x| x.mod_floor(q)).collect()
}

/// a * b mod (X^n0 + 1, Phi_(n1+1)(Y), q), computed over the integers.
fn schoolbook(a: &[BigInt], b: &[BigInt], n0: usize, n1: usize, q: &BigInt) -> Vec<BigInt> {
    let mut c: Vec<BigInt> = vec![BigInt::zero(); n0 * (2 * n1 - 1)];
    for ya in 0..n1 {
        for xa in 0..n0 {
            let x: &BigInt = &a[xa + ya * n0];
            if x.is_zero() {
                continue;
            }
            for yb in 0..n1 {
                for xb in 0..n0 {
                    let p: BigInt = x * &b[xb + yb * n0];
                    let row: usize = ya + yb;
                    if xa + xb < n0 {
                        c[xa + xb + row * n0] += p;
                    } else {
                        c[xa + xb - n0 + row * n0] -= p;
                    }
                }
            }
        }
    }
    // Y^n1 = -(1 + Y + ... + Y^(n1-1))
    for row in (n1..2 * n1 - 1).rev() {
        for x in 0..n0 {
            let top: BigInt = std::mem::take(&mut c[x + row * n0]);
            for j in row - n1..row {
                c[x + j * n0] -= &top;
            }
        }
    }
    c.truncate(n0 * n1);
    reduce_mod(&c, q)
}

/// Embeds a polynomial in X as a ring element.
fn embed_x0(b: &[BigInt], n: usize) -> Vec<BigInt> {
    let mut c: Vec<BigInt> = vec![BigInt::zero(); n];
    c[..b.len()].clone_from_slice(b);
    c
}

/// Embeds a polynomial in Y as a ring element.
fn embed_x1(b: &[BigInt], n0: usize, n: usize) -> Vec<BigInt> {
    let mut c: Vec<BigInt> = vec![BigInt::zero(); n];
    b.iter().enumerate().for_each(|(i, x)| c[i * n0] = x.clone());
    c
}

#[test]
fn mul_matches_schoolbook() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([0u8; 32]);
    let q: BigInt = (BigInt::one() << 40) - 87;
    for np in 1..=ring.max_limbs() {
        let a: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 10);
        let b: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 10);
        let want: Vec<BigInt> = schoolbook(&a, &b, ring.n0(), ring.n1(), &q);
        assert_eq!(ring.mul(&a, &b, np, &q), want, "np={}", np);
    }
}

#[test]
fn mul_large_coefficients() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([1u8; 32]);
    let q: BigInt = (BigInt::one() << 40) - 87;
    let a: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let b: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let want: Vec<BigInt> = schoolbook(&a, &b, ring.n0(), ring.n1(), &q);
    assert_eq!(ring.mul(&a, &b, 3, &q), want);

    // The RNS range may exceed q by far: a smaller q is a plain reduction.
    let q_small: BigInt = BigInt::from(1_000_003);
    assert_eq!(
        ring.mul(&a, &b, 3, &q_small),
        reduce_mod(&want_exact(&a, &b, &ring), &q_small)
    );
}

/// Exact product, centered into the range of the three primes.
fn want_exact(a: &[BigInt], b: &[BigInt], ring: &RingRNS) -> Vec<BigInt> {
    let modulus: BigInt = ring.crt().level(3).modulus().clone();
    let half: BigInt = &modulus >> 1;
    schoolbook(a, b, ring.n0(), ring.n1(), &modulus)
        .into_iter()
        .map(|x| if x > half { x - &modulus } else { x })
        .collect()
}

#[test]
fn square_commutativity_and_inplace() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([2u8; 32]);
    let q: BigInt = BigInt::from(0xffff_ffff_ffc5u64);
    let a: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let b: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let np: usize = 3;

    let ab: Vec<BigInt> = ring.mul(&a, &b, np, &q);
    assert_eq!(ring.mul(&b, &a, np, &q), ab);
    assert_eq!(ring.square(&a, np, &q), ring.mul(&a, &a, np, &q));

    let mut c: Vec<BigInt> = a.clone();
    ring.mul_inplace(&mut c, &b, np, &q);
    assert_eq!(c, ab);

    let mut d: Vec<BigInt> = a.clone();
    ring.square_inplace(&mut d, np, &q);
    assert_eq!(d, ring.square(&a, np, &q));
}

#[test]
fn pre_transformed_operands() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([3u8; 32]);
    let q: BigInt = (BigInt::one() << 45) + 59;
    let a: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let b: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let np: usize = 3;
    let want: Vec<BigInt> = schoolbook(&a, &b, ring.n0(), ring.n1(), &q);

    let ra: NttPolyRNS = ring.to_ntt(&a, np);
    let ra_lazy: NttPolyRNS = ring.to_ntt_lazy(&a, np);
    let rb: NttPolyRNS = ring.to_ntt(&b, np);
    let rb_lazy: NttPolyRNS = ring.to_ntt_lazy(&b, np);

    assert_eq!(ring.mul_ntt(&a, &rb, np, &q), want);
    assert_eq!(ring.mul_ntt_lazy(&a, &rb_lazy, np, &q), want);
    assert_eq!(ring.mul_dntt(&ra, &rb, np, &q), want);
    assert_eq!(ring.mul_dntt(&ra_lazy, &rb, np, &q), want);
    assert_eq!(ring.mul_dntt(&ra, &rb_lazy, np, &q), want);
    assert_eq!(ring.square_ntt(&ra, np, &q), ring.square(&a, np, &q));

    let mut c: Vec<BigInt> = a.clone();
    ring.mul_ntt_inplace(&mut c, &rb, np, &q);
    assert_eq!(c, want);
    let mut d: Vec<BigInt> = a.clone();
    ring.mul_ntt_lazy_inplace(&mut d, &rb_lazy, np, &q);
    assert_eq!(d, want);
}

#[test]
fn operands_at_a_lower_level() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([4u8; 32]);
    let q: BigInt = BigInt::from(65537);
    let a: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 8);
    let b: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 8);
    let rb: NttPolyRNS = ring.to_ntt(&b, 3);
    let want: Vec<BigInt> = schoolbook(&a, &b, ring.n0(), ring.n1(), &q);
    assert_eq!(ring.mul_ntt(&a, &rb, 1, &q), want);
    assert_eq!(ring.mul_ntt(&a, &rb, 2, &q), want);
}

#[test]
fn mul_x0_variants() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([5u8; 32]);
    let q: BigInt = (BigInt::one() << 44) - 21;
    let a: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let b: Vec<BigInt> = sample_mod(&mut source, ring.n0(), &q);
    let np: usize = 3;
    let want: Vec<BigInt> = schoolbook(&a, &embed_x0(&b, ring.n()), ring.n0(), ring.n1(), &q);

    assert_eq!(ring.mul_x0(&a, &b, np, &q), want);
    let rb: NttPolyRNS = ring.to_ntt_x0(&b, np);
    assert_eq!(ring.mul_ntt_x0(&a, &rb, np, &q), want);
    let ra: NttPolyRNS = ring.to_ntt_rows(&a, np);
    assert_eq!(ring.mul_dntt_x0(&ra, &rb, np, &q), want);

    let mut c: Vec<BigInt> = a.clone();
    ring.mul_x0_inplace(&mut c, &b, np, &q);
    assert_eq!(c, want);
    let mut d: Vec<BigInt> = a.clone();
    ring.mul_ntt_x0_inplace(&mut d, &rb, np, &q);
    assert_eq!(d, want);
}

#[test]
fn mul_x1_variants() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([6u8; 32]);
    let q: BigInt = (BigInt::one() << 44) - 21;
    let a: Vec<BigInt> = sample_mod(&mut source, ring.n(), &q);
    let b: Vec<BigInt> = sample_mod(&mut source, ring.n1(), &q);
    let np: usize = 3;
    let want: Vec<BigInt> = schoolbook(
        &a,
        &embed_x1(&b, ring.n0(), ring.n()),
        ring.n0(),
        ring.n1(),
        &q,
    );

    assert_eq!(ring.mul_x1(&a, &b, np, &q), want);
    let rb: NttPolyRNS = ring.to_ntt_x1(&b, np);
    let rb_lazy: NttPolyRNS = ring.to_ntt_x1_lazy(&b, np);
    assert_eq!(ring.mul_ntt_x1(&a, &rb, np, &q), want);
    assert_eq!(ring.mul_ntt_x1(&a, &rb_lazy, np, &q), want);
    let ra: NttPolyRNS = ring.to_ntt_columns(&a, np);
    assert_eq!(ring.mul_dntt_x1(&ra, &rb, np, &q), want);
    assert_eq!(ring.mul_dntt_x1(&ra, &rb_lazy, np, &q), want);
    let ra_lazy: NttPolyRNS = ring.to_ntt_layout(&a, np, Layout::ColumnsLazy);
    assert_eq!(ring.mul_dntt_x1(&ra_lazy, &rb, np, &q), want);

    let mut c: Vec<BigInt> = a.clone();
    ring.mul_x1_inplace(&mut c, &b, np, &q);
    assert_eq!(c, want);
    let mut d: Vec<BigInt> = a.clone();
    ring.mul_ntt_x1_inplace(&mut d, &rb_lazy, np, &q);
    assert_eq!(d, want);
}

#[test]
fn round_trips() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([7u8; 32]);
    let q: BigInt = (BigInt::one() << 60) + 33;
    let layouts: [Layout; 8] = [
        Layout::Full,
        Layout::FullLazy,
        Layout::Rows,
        Layout::Columns,
        Layout::ColumnsLazy,
        Layout::X0,
        Layout::X1,
        Layout::X1Lazy,
    ];
    for np in 1..=ring.max_limbs() {
        for layout in layouts {
            let len: usize = layout.len(ring.n0(), ring.n1());
            for a in [
                vec![BigInt::zero(); len],
                vec![BigInt::one(); len],
                sample_small(&mut source, len, 1 << 20),
            ] {
                let ra: NttPolyRNS = ring.to_ntt_layout(&a, np, layout);
                assert_eq!(ra.layout(), layout);
                assert_eq!(ring.from_ntt(&ra, &q), reduce_mod(&a, &q), "np={} {:?}", np, layout);
            }
        }
    }
}

#[test]
fn transform_is_additive() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([8u8; 32]);
    let q: BigInt = (BigInt::one() << 60) + 33;
    let a: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 20);
    let b: Vec<BigInt> = sample_small(&mut source, ring.n(), 1 << 20);
    let sum: Vec<BigInt> = a.iter().zip(b.iter()).map(|(x, y)| x + y).collect();

    let mut ra: NttPolyRNS = ring.to_ntt(&a, 3);
    let rb: NttPolyRNS = ring.to_ntt(&b, 3);
    ring.add_ntt_inplace(&mut ra, &rb, 3);
    assert_eq!(ra, ring.to_ntt(&sum, 3));
    assert_eq!(ring.from_ntt(&ra, &q), reduce_mod(&sum, &q));
}

#[test]
fn crt_is_exact() {
    let ring: RingRNS = small_ring();
    let mut source: Source = Source::new([9u8; 32]);
    for np in 1..=ring.max_limbs() {
        let modulus: BigInt = ring.crt().level(np).modulus().clone();
        let half: BigInt = &modulus >> 1;
        let mut v: Vec<BigInt> = sample_mod(&mut source, 16, &modulus)
            .into_iter()
            .map(|x| if x > half { x - &modulus } else { x })
            .collect();
        v.push(half.clone());
        v.push(-(&half - BigInt::one()));
        let residues: PolyRNS = ring.reduce(&v, np);
        (0..v.len()).for_each(|j| {
            let x: BigInt = ring
                .crt()
                .reconstruct_centered(residues.iter().map(|limb| limb[j]), np);
            assert_eq!(x, v[j], "np={} j={}", np, j);
        });
        let q: BigInt = BigInt::from(1u64 << 33);
        assert_eq!(ring.reconstruct(&residues, &q), reduce_mod(&v, &q));
    }
}

#[test]
#[should_panic]
fn two_lazy_operands_panic() {
    let ring: RingRNS = small_ring();
    let a: Vec<BigInt> = vec![BigInt::one(); ring.n()];
    let ra: NttPolyRNS = ring.to_ntt_lazy(&a, 1);
    ring.mul_dntt(&ra, &ra, 1, &BigInt::from(97));
}

#[test]
#[should_panic]
fn too_many_limbs_panic() {
    let ring: RingRNS = small_ring();
    let a: Vec<BigInt> = vec![BigInt::one(); ring.n()];
    ring.mul(&a, &a, ring.max_limbs() + 1, &BigInt::from(97));
}

#[test]
fn bank_follows_the_parameters() {
    let params: Parameters = Parameters::generate(2, 4, 50, 3).unwrap();
    let ring: RingRNS = RingRNS::new(&params);
    assert_eq!(ring.discrete_log().m(), 17);
    assert_eq!(ring.discrete_log().n(), ring.n1());
    for i in 0..ring.max_limbs() {
        assert_eq!(ring.ring(i).q(), params.primes[i]);
        assert_eq!(ring.ring(i).n(), ring.n());
        assert_eq!(ring.crt().level(i + 1).limbs(), i + 1);
    }
}

#[test]
fn invalid_parameters_are_rejected() {
    // 7681 = 1 mod 40 but not mod lcm(8, 16) * 17 = 272
    let params: Parameters = Parameters::new(2, vec![7681]).with_log_n1(4);
    assert_eq!(
        RingRNS::try_new(&params).err(),
        Some(Error::NotNttFriendly {
            q: 7681,
            nth_root: 272
        })
    );
    let params: Parameters = Parameters::new(2, vec![]).with_log_n1(4);
    assert!(matches!(
        RingRNS::try_new(&params),
        Err(Error::InvalidParameters(_))
    ));
}

#[test]
#[should_panic(expected = "is not prime")]
fn composite_prime_panics() {
    RingRNS::new(&Parameters::new(2, vec![7681 * 13]).with_log_n1(4));
}
