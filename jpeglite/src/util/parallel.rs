// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Runs `f` on each of the three items, on the rayon pool when the
/// `parallel` feature is enabled. Results keep the input order.
pub fn map3<I, O, F>(items: [I; 3], f: F) -> [O; 3]
where
    I: Send,
    O: Send,
    F: Fn(I) -> O + Sync,
{
    let [a, b, c] = items;
    #[cfg(feature = "parallel")]
    {
        let (oa, (ob, oc)) = rayon::join(|| f(a), || rayon::join(|| f(b), || f(c)));
        [oa, ob, oc]
    }
    #[cfg(not(feature = "parallel"))]
    {
        [f(a), f(b), f(c)]
    }
}

/// Like [map3], for fallible closures. Returns the first error in input order.
pub fn try_map3<I, O, E, F>(items: [I; 3], f: F) -> Result<[O; 3], E>
where
    I: Send,
    O: Send,
    E: Send,
    F: Fn(I) -> Result<O, E> + Sync,
{
    let [a, b, c] = map3(items, f);
    Ok([a?, b?, c?])
}
