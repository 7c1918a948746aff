use tilenav_kinematics::*;

fn main() {
    let tile_size = 32.0;
    let speed = 7.0;
    let frame_result = TileFrame::new(tile_size);
    let drive_result = ConstantSpeed::new(speed);

    let (frame, drive) = match (frame_result, drive_result) {
        (Ok(frame), Ok(drive)) => (frame, drive),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Failed to initialize kinematics: {:?}", e);
            eprintln!("Please ensure tile_size ({}) and speed ({}) are positive.", tile_size, speed);
            return;
        }
    };

    let mut position = Vector2::new(60.0, 60.0);
    let (target_col, target_row) = (4, 1);
    let target = frame.tile_center(target_col, target_row);

    println!("Initializing simulation...");
    println!("  {}", frame);
    println!("  {}", drive);
    println!("  Start:  {} (tile {:?})", position, frame.tile_of(position));
    println!("  Target: {} (tile ({}, {}))", target, target_col, target_row);
    println!("\nSimulating...");

    for i in 0..100 {
        if frame.tile_contains(target_col, target_row, position) {
            println!("\nReached target tile after {} steps.", i);
            break;
        }
        let direction = (target - position).normalize_or_zero();
        position = drive.step(position, direction);
        println!("Step {:>2}: position {} tile {:?}", i + 1, position, frame.tile_of(position));
    }

    println!("Final position: {}", position);
}
