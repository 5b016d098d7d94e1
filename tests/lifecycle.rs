use std::io::Cursor;
use textflow::io::single_value::SingleValueFileSpec;
use textflow::{
    Error, LineSeparator, ReadableRecordProducer, Record, WritableRecordConsumer,
};

fn producer_over(
    text: &str,
) -> impl ReadableRecordProducer + use<> {
    SingleValueFileSpec::read(false, 0, 0).producer(Cursor::new(text.as_bytes().to_vec()))
}

fn consumer_into_sink() -> impl WritableRecordConsumer {
    SingleValueFileSpec::write(LineSeparator::Lf, None, None, true).consumer(std::io::sink())
}

#[test]
fn producer_lifecycle_in_order() -> anyhow::Result<()> {
    let mut producer = producer_over("a\nb\n");
    producer.read_before()?;
    let records: Vec<Record> = producer.read_records()?.collect::<textflow::Result<_>>()?;
    assert_eq!(records.len(), 2);
    producer.read_after()?;
    producer.close()?;
    Ok(())
}

#[test]
fn producer_rejects_out_of_order_calls() {
    let mut producer = producer_over("a\n");

    let Err(err) = producer.read_records() else {
        panic!("read_records must fail before read_before");
    };
    assert!(matches!(
        err,
        Error::IllegalState {
            operation: "read_records",
            state: "Open"
        }
    ));

    let err = producer.read_after().unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalState {
            operation: "read_after",
            ..
        }
    ));

    producer.read_before().unwrap();
    assert!(producer.read_before().is_err());
}

#[test]
fn producer_close_is_legal_everywhere_and_idempotent() -> anyhow::Result<()> {
    let mut fresh = producer_over("a\n");
    fresh.close()?;
    fresh.close()?;

    let mut started = producer_over("a\n");
    started.read_before()?;
    started.close()?;
    started.close()?;

    // No lifecycle method except close is legal after close.
    assert!(started.read_records().is_err());
    Ok(())
}

#[test]
fn producer_counters_require_read_after() -> anyhow::Result<()> {
    let spec = SingleValueFileSpec::read(false, 1, 1);
    let mut producer = spec.producer(Cursor::new(b"first\nmiddle\nlast\n".to_vec()));

    producer.read_before()?;
    let records: Vec<Record> = producer.read_records()?.collect::<textflow::Result<_>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value(), Some("middle"));

    producer.read_after()?;
    assert_eq!(producer.ignored_first()?.len(), 1);
    assert_eq!(producer.ignored_first()?[0].text, "first");
    assert_eq!(producer.ignored_last()?.len(), 1);
    assert_eq!(producer.ignored_last()?[0].text, "last");
    assert_eq!(producer.record_count()?, 3);
    producer.close()?;
    Ok(())
}

#[test]
fn producer_counters_illegal_before_read_after() -> anyhow::Result<()> {
    let spec = SingleValueFileSpec::read(false, 0, 0);
    let mut producer = spec.producer(Cursor::new(b"a\n".to_vec()));
    producer.read_before()?;
    assert!(matches!(
        producer.record_count(),
        Err(Error::IllegalState { .. })
    ));
    Ok(())
}

#[test]
fn producer_inspector_sees_raw_records() -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let spec = SingleValueFileSpec::read(false, 0, 0);
    let mut producer = spec
        .producer(Cursor::new(b"a\nb\nc\n".to_vec()))
        .with_inspector(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

    producer.read_before()?;
    let records: Vec<Record> = producer.read_records()?.collect::<textflow::Result<_>>()?;
    producer.read_after()?;
    producer.close()?;

    assert_eq!(records.len(), 3);
    assert_eq!(seen.load(Ordering::Relaxed), 3);
    Ok(())
}

#[test]
fn consumer_lifecycle_in_order() -> anyhow::Result<()> {
    let mut consumer = consumer_into_sink();
    consumer.write_before()?;
    consumer.write_record(&Record::of_value(None, None, Some("a".to_string())))?;
    consumer.write_record(&Record::of_value(None, None, Some("b".to_string())))?;
    consumer.write_after()?;
    consumer.close()?;
    Ok(())
}

#[test]
fn consumer_zero_records_is_legal() -> anyhow::Result<()> {
    let mut consumer = consumer_into_sink();
    consumer.write_before()?;
    consumer.write_after()?;
    consumer.close()?;
    Ok(())
}

#[test]
fn consumer_rejects_out_of_order_calls() {
    let record = Record::of_value(None, None, Some("a".to_string()));

    let mut consumer = consumer_into_sink();
    assert!(matches!(
        consumer.write_record(&record),
        Err(Error::IllegalState {
            operation: "write_record",
            state: "Open"
        })
    ));

    let mut consumer = consumer_into_sink();
    consumer.write_before().unwrap();
    consumer.write_after().unwrap();
    assert!(consumer.write_record(&record).is_err());
}

#[test]
fn consumer_flush_illegal_after_close() -> anyhow::Result<()> {
    let mut consumer = consumer_into_sink();
    consumer.write_before()?;
    consumer.flush()?;
    consumer.close()?;
    consumer.close()?;
    assert!(matches!(
        consumer.flush(),
        Err(Error::IllegalState {
            operation: "flush",
            state: "Close"
        })
    ));
    Ok(())
}
