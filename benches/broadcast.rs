use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use bencher::{benchmark_group, benchmark_main, black_box, Bencher};
use rxcore::prelude::*;

fn registry_add_remove(b: &mut Bencher) {
  let registry = ConcurrentRegistry::new();
  b.iter(|| {
    for i in 0..64 {
      registry.add(i);
    }
    for i in 0..64 {
      registry.remove(&i);
    }
  });
}

fn subject_broadcast(b: &mut Bencher) {
  let subject = Subject::<usize, ()>::new();
  let hits = Arc::new(AtomicUsize::new(0));
  for _ in 0..16 {
    let hits = hits.clone();
    subject.subscribe(move |v| {
      hits.fetch_add(v, Ordering::Relaxed);
    });
  }
  b.iter(|| {
    for i in 0..100 {
      subject.next(black_box(i));
    }
  });
}

fn subscribe_unsubscribe(b: &mut Bencher) {
  let subject = Subject::<usize, ()>::new();
  b.iter(|| {
    let subscription = subject.subscribe(|_| {});
    subscription.unsubscribe().unwrap();
  });
}

benchmark_group!(benches, registry_add_remove, subject_broadcast, subscribe_unsubscribe);
benchmark_main!(benches);
